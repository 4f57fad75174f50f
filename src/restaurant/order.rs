//! Orders (orders.dat): fixed-capacity item list, totals, append-only history.
//!
//! Payload layout (3390 B, LE):
//!   [id u32][customer 50][num_items u32]
//!   50 × [item_id u32][qty u32][unit_price_cents i64][item_name 50]
//!   [subtotal i64][tax i64][total i64][timestamp i64]
//!
//! Unused item slots are zero-filled.

use anyhow::{anyhow, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use crate::codec::{check_text, read_fixed_str, write_fixed_str, FixedRecord};
use crate::config::FlatConfig;
use crate::consts::{CUSTOMER_NAME_LEN, MAX_ITEMS_PER_ORDER, MENU_NAME_LEN, ORDERS_FILE, TAG_ORDER};
use crate::money::Cents;
use crate::store::RecordStore;
use crate::util::now_secs;

use super::menu::MenuItem;

const ORDER_ITEM_SIZE: usize = 4 + 4 + 8 + MENU_NAME_LEN;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub item_id: u32,
    pub qty: u32,
    /// Price per unit when the order was placed.
    pub unit_price: Cents,
    pub item_name: String,
}

impl OrderItem {
    pub fn line_total(&self) -> Option<Cents> {
        self.unit_price.checked_times(self.qty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Cents,
    pub tax: Cents,
    pub total: Cents,
}

impl Totals {
    /// subtotal = Σ unit_price·qty, tax = subtotal·rate rounded half up, total = subtotal + tax.
    pub fn compute(items: &[OrderItem], tax_bps: u32) -> Result<Totals> {
        let mut subtotal = Cents::ZERO;
        for it in items {
            let line = it
                .line_total()
                .ok_or_else(|| anyhow!("line total overflow for item {}", it.item_id))?;
            subtotal = subtotal
                .checked_add(line)
                .ok_or_else(|| anyhow!("order subtotal overflow"))?;
        }
        let tax = subtotal.apply_bps(tax_bps);
        let total = subtotal
            .checked_add(tax)
            .ok_or_else(|| anyhow!("order total overflow"))?;
        Ok(Totals {
            subtotal,
            tax,
            total,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: u32,
    pub customer: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Cents,
    pub tax: Cents,
    pub total: Cents,
    /// Unix seconds.
    pub timestamp: i64,
}

impl FixedRecord for Order {
    const TAG: &'static [u8; 4] = TAG_ORDER;
    const SIZE: usize = 4 + CUSTOMER_NAME_LEN + 4 + MAX_ITEMS_PER_ORDER * ORDER_ITEM_SIZE + 4 * 8;

    fn key(&self) -> u64 {
        u64::from(self.id)
    }

    fn encode(&self, out: &mut [u8]) -> Result<()> {
        if self.items.len() > MAX_ITEMS_PER_ORDER {
            return Err(anyhow!(
                "order {} has {} items, capacity is {}",
                self.id,
                self.items.len(),
                MAX_ITEMS_PER_ORDER
            ));
        }
        let mut w = out;
        w.write_u32::<LittleEndian>(self.id)?;
        write_fixed_str(&mut w, &self.customer, CUSTOMER_NAME_LEN)?;
        w.write_u32::<LittleEndian>(self.items.len() as u32)?;
        for it in &self.items {
            w.write_u32::<LittleEndian>(it.item_id)?;
            w.write_u32::<LittleEndian>(it.qty)?;
            w.write_i64::<LittleEndian>(it.unit_price.cents())?;
            write_fixed_str(&mut w, &it.item_name, MENU_NAME_LEN)?;
        }
        // `out` came in zero-filled: skip the unused item slots
        let unused = (MAX_ITEMS_PER_ORDER - self.items.len()) * ORDER_ITEM_SIZE;
        let rest = std::mem::take(&mut w);
        w = &mut rest[unused..];
        w.write_i64::<LittleEndian>(self.subtotal.cents())?;
        w.write_i64::<LittleEndian>(self.tax.cents())?;
        w.write_i64::<LittleEndian>(self.total.cents())?;
        w.write_i64::<LittleEndian>(self.timestamp)?;
        Ok(())
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = buf;
        let id = r.read_u32::<LittleEndian>()?;
        let customer = read_fixed_str(&mut r, CUSTOMER_NAME_LEN)?;
        let n = r.read_u32::<LittleEndian>()? as usize;
        if n > MAX_ITEMS_PER_ORDER {
            return Err(anyhow!(
                "order {} claims {} items, capacity is {}",
                id,
                n,
                MAX_ITEMS_PER_ORDER
            ));
        }
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            let item_id = r.read_u32::<LittleEndian>()?;
            let qty = r.read_u32::<LittleEndian>()?;
            let unit_price = Cents::from_cents(r.read_i64::<LittleEndian>()?);
            let item_name = read_fixed_str(&mut r, MENU_NAME_LEN)?;
            items.push(OrderItem {
                item_id,
                qty,
                unit_price,
                item_name,
            });
        }
        r = &r[(MAX_ITEMS_PER_ORDER - n) * ORDER_ITEM_SIZE..];
        let subtotal = Cents::from_cents(r.read_i64::<LittleEndian>()?);
        let tax = Cents::from_cents(r.read_i64::<LittleEndian>()?);
        let total = Cents::from_cents(r.read_i64::<LittleEndian>()?);
        let timestamp = r.read_i64::<LittleEndian>()?;
        Ok(Self {
            id,
            customer,
            items,
            subtotal,
            tax,
            total,
            timestamp,
        })
    }
}

/// Result of adding one line to a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddLine {
    Added,
    /// The menu item is marked unavailable.
    Unavailable,
    /// The draft already holds MAX_ITEMS_PER_ORDER lines.
    Full,
}

/// An order being assembled, before it gets an id and a timestamp.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    customer: String,
    items: Vec<OrderItem>,
}

impl OrderDraft {
    pub fn new(customer: &str) -> Result<Self> {
        let customer = customer.trim();
        check_text("customer name", customer, CUSTOMER_NAME_LEN)?;
        Ok(Self {
            customer: customer.to_string(),
            items: Vec::new(),
        })
    }

    /// Add `qty` of `item` at its current price.
    pub fn add(&mut self, item: &MenuItem, qty: u32) -> Result<AddLine> {
        if qty == 0 {
            return Err(anyhow!("quantity must be greater than zero"));
        }
        if !item.available {
            return Ok(AddLine::Unavailable);
        }
        if self.is_full() {
            return Ok(AddLine::Full);
        }
        self.items.push(OrderItem {
            item_id: item.id,
            qty,
            unit_price: item.price,
            item_name: item.name.clone(),
        });
        Ok(AddLine::Added)
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_ITEMS_PER_ORDER
    }
}

pub struct Orders {
    store: RecordStore<Order>,
    tax_bps: u32,
}

impl Orders {
    pub fn open(cfg: &FlatConfig) -> Self {
        Self::with_store(
            RecordStore::new(cfg.file(ORDERS_FILE)).with_fsync(cfg.fsync),
            cfg.tax_bps,
        )
    }

    pub fn with_store(store: RecordStore<Order>, tax_bps: u32) -> Self {
        Self { store, tax_bps }
    }

    pub fn store(&self) -> &RecordStore<Order> {
        &self.store
    }

    pub fn tax_bps(&self) -> u32 {
        self.tax_bps
    }

    /// Assign the next id, stamp the current time, compute totals and append.
    pub fn place(&self, draft: OrderDraft) -> Result<Order> {
        self.place_at(draft, now_secs())
    }

    /// Same as `place` with an explicit timestamp.
    pub fn place_at(&self, draft: OrderDraft, timestamp: i64) -> Result<Order> {
        if draft.is_empty() {
            return Err(anyhow!("no items in order"));
        }
        let totals = Totals::compute(&draft.items, self.tax_bps)?;
        let id = u32::try_from(self.store.next_id()?)
            .map_err(|_| anyhow!("order id space exhausted"))?;
        let order = Order {
            id,
            customer: draft.customer,
            items: draft.items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            timestamp,
        };
        self.store.append(&order)?;
        log::info!(
            "placed order {} for '{}': {} line(s), total {}",
            order.id,
            order.customer,
            order.items.len(),
            order.total
        );
        Ok(order)
    }

    pub fn list(&self) -> Result<Vec<Order>> {
        self.store.scan_all()
    }

    pub fn find(&self, id: u32) -> Result<Option<Order>> {
        Ok(self.store.find_by_key(u64::from(id))?.map(|f| f.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_slot, encode_slot};

    fn item(id: u32, name: &str, price: i64) -> MenuItem {
        MenuItem {
            id,
            name: name.into(),
            category: "Main".into(),
            price: Cents::from_cents(price),
            available: true,
        }
    }

    #[test]
    fn order_record_size() {
        assert_eq!(Order::SIZE, 3390);
    }

    #[test]
    fn order_slot_roundtrip_keeps_trailer_fields() {
        let order = Order {
            id: 3,
            customer: "Ann".into(),
            items: vec![OrderItem {
                item_id: 1,
                qty: 2,
                unit_price: Cents::from_cents(1000),
                item_name: "Soup".into(),
            }],
            subtotal: Cents::from_cents(2000),
            tax: Cents::from_cents(100),
            total: Cents::from_cents(2100),
            timestamp: 1_700_000_000,
        };
        let slot = encode_slot(&order).unwrap();
        assert_eq!(decode_slot::<Order>(&slot).unwrap(), order);
    }

    #[test]
    fn totals_round_each_step() {
        let mut d = OrderDraft::new("Bob").unwrap();
        assert_eq!(d.add(&item(1, "Pasta", 1000), 2).unwrap(), AddLine::Added);
        assert_eq!(d.add(&item(2, "Salad", 733), 1).unwrap(), AddLine::Added);
        let t = Totals::compute(d.items(), 500).unwrap();
        assert_eq!(t.subtotal, Cents::from_cents(2733));
        assert_eq!(t.tax, Cents::from_cents(137));
        assert_eq!(t.total, Cents::from_cents(2870));
    }

    #[test]
    fn draft_refuses_unavailable_zero_qty_and_overflow() {
        let mut d = OrderDraft::new("Cy").unwrap();
        let mut off = item(9, "Off", 100);
        off.available = false;
        assert_eq!(d.add(&off, 1).unwrap(), AddLine::Unavailable);
        assert!(d.add(&item(1, "A", 100), 0).is_err());

        for _ in 0..MAX_ITEMS_PER_ORDER {
            assert_eq!(d.add(&item(1, "A", 100), 1).unwrap(), AddLine::Added);
        }
        assert!(d.is_full());
        assert_eq!(d.add(&item(1, "A", 100), 1).unwrap(), AddLine::Full);
        assert_eq!(d.len(), MAX_ITEMS_PER_ORDER);
    }

    #[test]
    fn draft_accepts_blank_customer() {
        let d = OrderDraft::new("   ").unwrap();
        assert_eq!(d.customer, "");
        assert!(d.is_empty());
        assert!(OrderDraft::new(&"x".repeat(CUSTOMER_NAME_LEN + 1)).is_err());
    }
}
