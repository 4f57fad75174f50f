use anyhow::Result;

use flatrec::console::restaurant::print_order;
use flatrec::restaurant::Restaurant;

use super::util::{print_json, require_admin};

pub fn exec(r: &Restaurant, password: String, json: bool) -> Result<()> {
    require_admin(r, &password)?;
    let orders = r.orders.list()?;
    if json {
        return print_json(&orders);
    }
    if orders.is_empty() {
        println!("No orders found.");
        return Ok(());
    }
    let mut out = std::io::stdout();
    for o in &orders {
        print_order(&mut out, o)?;
    }
    Ok(())
}
