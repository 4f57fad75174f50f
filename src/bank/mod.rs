//! bank: banking record system: accounts kept in a fixed-record store.

pub mod account;
pub mod ledger;

pub use account::{Account, AccountKind};
pub use ledger::{AccountUpdate, Ledger, NewAccount, Withdrawal};
