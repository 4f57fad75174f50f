use anyhow::{anyhow, Result};

use flatrec::console::restaurant::print_invoice;
use flatrec::restaurant::{AddLine, OrderDraft, Restaurant};

use super::util::print_json;

pub fn exec(r: &Restaurant, customer: String, items: Vec<(u32, u32)>, json: bool) -> Result<()> {
    let menu = r.menu.list()?;
    let mut draft = OrderDraft::new(&customer)?;
    for (id, qty) in items {
        let item = menu
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| anyhow!("menu item {} not found", id))?;
        match draft.add(item, qty)? {
            AddLine::Added => {}
            AddLine::Unavailable => {
                return Err(anyhow!("item '{}' is currently not available", item.name))
            }
            AddLine::Full => {
                return Err(anyhow!(
                    "too many lines: an order holds at most {}",
                    draft.len()
                ))
            }
        }
    }
    let order = r.orders.place(draft)?;
    if json {
        return print_json(&order);
    }
    print_invoice(&mut std::io::stdout(), &order, r.orders.tax_bps())?;
    Ok(())
}
