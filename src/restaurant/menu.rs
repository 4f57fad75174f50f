//! Menu items (menu.dat) and the MenuBook service.
//!
//! Payload layout (93 B, LE):
//!   [id u32][name 50][category 30][price_cents i64][available u8]
//!
//! Updates go through load-all → mutate in memory → rewrite_all, the file is
//! never patched in place.

use anyhow::{anyhow, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use crate::codec::{check_text, read_fixed_str, write_fixed_str, FixedRecord};
use crate::config::FlatConfig;
use crate::consts::{MENU_CATEGORY_LEN, MENU_FILE, MENU_NAME_LEN, TAG_MENU_ITEM};
use crate::money::Cents;
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub price: Cents,
    pub available: bool,
}

impl FixedRecord for MenuItem {
    const TAG: &'static [u8; 4] = TAG_MENU_ITEM;
    const SIZE: usize = 4 + MENU_NAME_LEN + MENU_CATEGORY_LEN + 8 + 1;

    fn key(&self) -> u64 {
        u64::from(self.id)
    }

    fn encode(&self, out: &mut [u8]) -> Result<()> {
        let mut w = out;
        w.write_u32::<LittleEndian>(self.id)?;
        write_fixed_str(&mut w, &self.name, MENU_NAME_LEN)?;
        write_fixed_str(&mut w, &self.category, MENU_CATEGORY_LEN)?;
        w.write_i64::<LittleEndian>(self.price.cents())?;
        w.write_u8(u8::from(self.available))?;
        Ok(())
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = buf;
        let id = r.read_u32::<LittleEndian>()?;
        let name = read_fixed_str(&mut r, MENU_NAME_LEN)?;
        let category = read_fixed_str(&mut r, MENU_CATEGORY_LEN)?;
        let price = Cents::from_cents(r.read_i64::<LittleEndian>()?);
        let available = r.read_u8()? != 0;
        Ok(Self {
            id,
            name,
            category,
            price,
            available,
        })
    }
}

/// Fields to change; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Cents>,
    pub available: Option<bool>,
}

impl MenuItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.available.is_none()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow!("item name must not be empty"));
    }
    check_text("item name", name, MENU_NAME_LEN)
}

fn validate_price(price: Cents) -> Result<()> {
    if price.is_negative() {
        return Err(anyhow!("price must not be negative, got {}", price));
    }
    Ok(())
}

pub struct MenuBook {
    store: RecordStore<MenuItem>,
}

impl MenuBook {
    pub fn open(cfg: &FlatConfig) -> Self {
        Self::with_store(RecordStore::new(cfg.file(MENU_FILE)).with_fsync(cfg.fsync))
    }

    pub fn with_store(store: RecordStore<MenuItem>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<MenuItem> {
        &self.store
    }

    /// Add an item under the next free id. New items start out available.
    pub fn add_item(&self, name: &str, category: &str, price: Cents) -> Result<MenuItem> {
        validate_name(name)?;
        check_text("category", category, MENU_CATEGORY_LEN)?;
        validate_price(price)?;

        let id = u32::try_from(self.store.next_id()?)
            .map_err(|_| anyhow!("menu item id space exhausted"))?;
        let item = MenuItem {
            id,
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            price,
            available: true,
        };
        self.store.append(&item)?;
        log::info!("added menu item {} '{}'", item.id, item.name);
        Ok(item)
    }

    pub fn list(&self) -> Result<Vec<MenuItem>> {
        self.store.scan_all()
    }

    /// Items that can currently be ordered.
    pub fn available(&self) -> Result<Vec<MenuItem>> {
        Ok(self.list()?.into_iter().filter(|i| i.available).collect())
    }

    pub fn find(&self, id: u32) -> Result<Option<MenuItem>> {
        Ok(self.store.find_by_key(u64::from(id))?.map(|f| f.record))
    }

    /// Apply `patch` to item `id` and rewrite the menu file.
    pub fn update_item(&self, id: u32, patch: MenuItemPatch) -> Result<Option<MenuItem>> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(category) = &patch.category {
            check_text("category", category, MENU_CATEGORY_LEN)?;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }

        let mut items = self.list()?;
        let Some(item) = items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            item.category = category.trim().to_string();
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(available) = patch.available {
            item.available = available;
        }
        let updated = item.clone();

        self.store.rewrite_all(&items)?;
        Ok(Some(updated))
    }
}
