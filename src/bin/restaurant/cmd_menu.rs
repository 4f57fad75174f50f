use anyhow::{anyhow, Result};

use flatrec::console::restaurant::print_menu;
use flatrec::restaurant::{MenuItemPatch, Restaurant};
use flatrec::Cents;

use super::util::{print_json, require_admin};

pub fn exec_show(r: &Restaurant, all: bool, json: bool) -> Result<()> {
    let items = if all { r.menu.list()? } else { r.menu.available()? };
    if json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("No menu items found.");
        return Ok(());
    }
    print_menu(&mut std::io::stdout(), &items)?;
    Ok(())
}

pub fn exec_add(
    r: &Restaurant,
    password: String,
    name: String,
    category: String,
    price: Cents,
) -> Result<()> {
    require_admin(r, &password)?;
    let item = r.menu.add_item(&name, &category, price)?;
    println!("Added menu item with ID {}.", item.id);
    Ok(())
}

pub fn exec_update(r: &Restaurant, password: String, id: u32, patch: MenuItemPatch) -> Result<()> {
    require_admin(r, &password)?;
    if patch.is_empty() {
        return Err(anyhow!(
            "nothing to update: pass --name, --category, --price or --available"
        ));
    }
    let item = r
        .menu
        .update_item(id, patch)?
        .ok_or_else(|| anyhow!("menu item {} not found", id))?;
    println!(
        "Updated item {}: {} | {} | {} | {}",
        item.id,
        item.name,
        item.category,
        item.price,
        if item.available { "available" } else { "unavailable" }
    );
    Ok(())
}
