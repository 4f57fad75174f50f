//! restaurant: menu, orders and the admin credential, each in its own store.

pub mod admin;
pub mod menu;
pub mod order;

pub use admin::{AdminAuth, AdminCredential};
pub use menu::{MenuBook, MenuItem, MenuItemPatch};
pub use order::{AddLine, Order, OrderDraft, OrderItem, Orders, Totals};

use crate::config::FlatConfig;

/// The three restaurant stores opened against one data dir.
pub struct Restaurant {
    pub menu: MenuBook,
    pub orders: Orders,
    pub admin: AdminAuth,
}

impl Restaurant {
    pub fn open(cfg: &FlatConfig) -> Self {
        Self {
            menu: MenuBook::open(cfg),
            orders: Orders::open(cfg),
            admin: AdminAuth::open(cfg),
        }
    }
}
