//! Restaurant management menus: main, admin and customer.

use std::io::{self, BufRead, Write};

use crate::consts::MAX_ITEMS_PER_ORDER;
use crate::money::Cents;
use crate::restaurant::{AddLine, MenuItem, MenuItemPatch, Order, OrderDraft, Restaurant};
use crate::util::format_local_time;

use super::prompt::{or_quit, or_report, Flow, Prompter};

pub fn run<R: BufRead, W: Write>(r: &Restaurant, p: &mut Prompter<R, W>) -> io::Result<()> {
    if let Err(e) = r.admin.ensure() {
        writeln!(p.out(), "Unable to create admin credential file.")?;
        p.report(&e)?;
    }
    loop {
        let out = p.out();
        writeln!(out, "\n====== Restaurant Management System ======")?;
        writeln!(out, "1. Admin")?;
        writeln!(out, "2. Customer")?;
        writeln!(out, "0. Exit")?;
        let Some(choice) = p.parse::<u32>("Select option: ")? else {
            return Ok(());
        };
        let flow = match choice {
            1 => admin_login(r, p)?,
            2 => customer_menu(r, p)?,
            0 => {
                writeln!(p.out(), "Goodbye!")?;
                Flow::Quit
            }
            _ => {
                writeln!(p.out(), "Invalid option. Try again.")?;
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            return Ok(());
        }
    }
}

fn admin_login<R: BufRead, W: Write>(r: &Restaurant, p: &mut Prompter<R, W>) -> io::Result<Flow> {
    let entered = or_quit!(p.line("Enter admin password: "));
    if !or_report!(p, r.admin.verify(&entered)) {
        writeln!(p.out(), "Admin login failed.")?;
        return Ok(Flow::Continue);
    }
    admin_menu(r, p)
}

fn admin_menu<R: BufRead, W: Write>(r: &Restaurant, p: &mut Prompter<R, W>) -> io::Result<Flow> {
    loop {
        let out = p.out();
        writeln!(out, "\n--- ADMIN MENU ---")?;
        writeln!(out, "1. Add Menu Item")?;
        writeln!(out, "2. Update Menu Item")?;
        writeln!(out, "3. View Menu Items")?;
        writeln!(out, "4. View Orders (Order History)")?;
        writeln!(out, "5. Change Admin Password")?;
        writeln!(out, "0. Logout")?;
        let choice = or_quit!(p.parse::<u32>("Choice: "));
        let flow = match choice {
            1 => add_menu_item(r, p)?,
            2 => update_menu_item(r, p)?,
            3 => view_menu(r, p)?,
            4 => order_history(r, p)?,
            5 => change_password(r, p)?,
            0 => {
                writeln!(p.out(), "Logging out of admin.")?;
                return Ok(Flow::Continue);
            }
            _ => {
                writeln!(p.out(), "Invalid choice.")?;
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            return Ok(Flow::Quit);
        }
    }
}

fn customer_menu<R: BufRead, W: Write>(r: &Restaurant, p: &mut Prompter<R, W>) -> io::Result<Flow> {
    loop {
        let out = p.out();
        writeln!(out, "\n--- CUSTOMER MENU ---")?;
        writeln!(out, "1. View Menu")?;
        writeln!(out, "2. Place Order")?;
        writeln!(out, "0. Back")?;
        let choice = or_quit!(p.parse::<u32>("Choice: "));
        let flow = match choice {
            1 => view_available(r, p)?,
            2 => place_order(r, p)?,
            0 => return Ok(Flow::Continue),
            _ => {
                writeln!(p.out(), "Invalid choice.")?;
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            return Ok(Flow::Quit);
        }
    }
}

fn non_negative_price(s: &str) -> Result<Cents, String> {
    let price = Cents::parse(s).map_err(|e| e.to_string())?;
    if price.is_negative() {
        return Err("price must not be negative".into());
    }
    Ok(price)
}

fn add_menu_item<R: BufRead, W: Write>(r: &Restaurant, p: &mut Prompter<R, W>) -> io::Result<Flow> {
    writeln!(p.out(), "\n--- Add Menu Item ---")?;
    let name = or_quit!(p.line("Item name: "));
    let category = or_quit!(p.line("Category: "));
    let price = or_quit!(p.parse_with("Price (e.g., 99.50): ", non_negative_price));
    let item = or_report!(p, r.menu.add_item(&name, &category, price));
    writeln!(p.out(), "Added menu item with ID {}.", item.id)?;
    Ok(Flow::Continue)
}

pub fn print_menu<W: Write>(out: &mut W, items: &[MenuItem]) -> io::Result<()> {
    writeln!(out, "\n--- MENU ITEMS ({}) ---", items.len())?;
    writeln!(
        out,
        "{:<5} {:<25} {:<12} {:<8} {:<10}",
        "ID", "Name", "Category", "Price", "Available"
    )?;
    for it in items {
        writeln!(
            out,
            "{:<5} {:<25} {:<12} {:<8} {:<10}",
            it.id,
            it.name,
            it.category,
            it.price,
            if it.available { "Yes" } else { "No" }
        )?;
    }
    Ok(())
}

fn view_menu<R: BufRead, W: Write>(r: &Restaurant, p: &mut Prompter<R, W>) -> io::Result<Flow> {
    let items = or_report!(p, r.menu.list());
    if items.is_empty() {
        writeln!(p.out(), "No menu items found.")?;
    } else {
        print_menu(p.out(), &items)?;
    }
    Ok(Flow::Continue)
}

fn view_available<R: BufRead, W: Write>(
    r: &Restaurant,
    p: &mut Prompter<R, W>,
) -> io::Result<Flow> {
    let items = or_report!(p, r.menu.available());
    if items.is_empty() {
        writeln!(p.out(), "No menu items available.")?;
    } else {
        print_menu(p.out(), &items)?;
    }
    Ok(Flow::Continue)
}

fn update_menu_item<R: BufRead, W: Write>(
    r: &Restaurant,
    p: &mut Prompter<R, W>,
) -> io::Result<Flow> {
    writeln!(p.out(), "\n--- Update Menu Item ---")?;
    let items = or_report!(p, r.menu.list());
    if items.is_empty() {
        writeln!(p.out(), "Menu is empty.")?;
        return Ok(Flow::Continue);
    }
    print_menu(p.out(), &items)?;
    let id = or_quit!(p.parse::<u32>("Enter item ID to update: "));
    let Some(found) = items.iter().find(|i| i.id == id) else {
        writeln!(p.out(), "Item with ID {} not found.", id)?;
        return Ok(Flow::Continue);
    };
    writeln!(
        p.out(),
        "Found: {} | Category: {} | Price: {} | Available: {}",
        found.name,
        found.category,
        found.price,
        if found.available { "Yes" } else { "No" }
    )?;

    let mut patch = MenuItemPatch::default();
    let name = or_quit!(p.line("Enter new name (or press enter to keep): "));
    if !name.trim().is_empty() {
        patch.name = Some(name);
    }
    let category = or_quit!(p.line("Enter new category (or press enter to keep): "));
    if !category.trim().is_empty() {
        patch.category = Some(category);
    }
    patch.price = or_quit!(p.parse_with("Enter new price (enter -1 to keep): ", |s| {
        if s == "-1" {
            Ok(None)
        } else {
            non_negative_price(s).map(Some)
        }
    }));
    patch.available = or_quit!(p.parse_with(
        "Set availability? (1 = available, 0 = not) (enter -1 to keep): ",
        |s| match s {
            "-1" => Ok(None),
            "1" => Ok(Some(true)),
            "0" => Ok(Some(false)),
            _ => Err("expected 1, 0 or -1".into()),
        }
    ));

    if patch.is_empty() {
        writeln!(p.out(), "Nothing to change.")?;
        return Ok(Flow::Continue);
    }
    match or_report!(p, r.menu.update_item(id, patch)) {
        Some(_) => writeln!(p.out(), "Menu item updated.")?,
        None => writeln!(p.out(), "Item with ID {} not found.", id)?,
    }
    Ok(Flow::Continue)
}

pub fn print_order<W: Write>(out: &mut W, o: &Order) -> io::Result<()> {
    writeln!(
        out,
        "\nOrder ID: {} | Customer: {} | Date: {}",
        o.id,
        o.customer,
        format_local_time(o.timestamp)
    )?;
    writeln!(out, "Items:")?;
    for it in &o.items {
        let line = it.line_total().unwrap_or(Cents::ZERO);
        writeln!(
            out,
            "  - {} (ID {}) x{} @ {} each  => {}",
            it.item_name, it.item_id, it.qty, it.unit_price, line
        )?;
    }
    writeln!(
        out,
        "Subtotal: {} | Tax: {} | Total: {}",
        o.subtotal, o.tax, o.total
    )
}

fn order_history<R: BufRead, W: Write>(r: &Restaurant, p: &mut Prompter<R, W>) -> io::Result<Flow> {
    let orders = or_report!(p, r.orders.list());
    if orders.is_empty() {
        writeln!(p.out(), "No orders found.")?;
        return Ok(Flow::Continue);
    }
    let out = p.out();
    writeln!(out, "\n--- ORDER HISTORY ({}) ---", orders.len())?;
    for o in &orders {
        print_order(out, o)?;
    }
    Ok(Flow::Continue)
}

fn change_password<R: BufRead, W: Write>(
    r: &Restaurant,
    p: &mut Prompter<R, W>,
) -> io::Result<Flow> {
    let new_password = or_quit!(p.line("Enter new admin password: "));
    if or_report!(p, r.admin.change_password(&new_password)) {
        writeln!(p.out(), "Admin password updated.")?;
    } else {
        writeln!(p.out(), "Password not changed (empty).")?;
    }
    Ok(Flow::Continue)
}

pub fn print_invoice<W: Write>(out: &mut W, o: &Order, tax_bps: u32) -> io::Result<()> {
    writeln!(out, "\n--- INVOICE ---")?;
    writeln!(out, "Order ID: {}", o.id)?;
    writeln!(out, "Customer: {}", o.customer)?;
    writeln!(out, "Date: {}", format_local_time(o.timestamp))?;
    writeln!(out, "\nItems:")?;
    for it in &o.items {
        let line = it.line_total().unwrap_or(Cents::ZERO);
        writeln!(
            out,
            " - {:<25} x{} @ {} => {}",
            it.item_name, it.qty, it.unit_price, line
        )?;
    }
    writeln!(
        out,
        "\nSubtotal: {}\nTax ({}.{:02}%): {}\nTotal: {}",
        o.subtotal,
        tax_bps / 100,
        tax_bps % 100,
        o.tax,
        o.total
    )
}

fn place_order<R: BufRead, W: Write>(r: &Restaurant, p: &mut Prompter<R, W>) -> io::Result<Flow> {
    writeln!(p.out(), "\n--- Place Order ---")?;
    let customer = or_quit!(p.line("Customer name: "));
    let mut draft = or_report!(p, OrderDraft::new(&customer));

    let menu = or_report!(p, r.menu.list());
    let available: Vec<&MenuItem> = menu.iter().filter(|i| i.available).collect();
    if available.is_empty() {
        writeln!(p.out(), "No menu items available.")?;
        return Ok(Flow::Continue);
    }
    let out = p.out();
    writeln!(out, "\nAvailable Menu:")?;
    writeln!(out, "{:<5} {:<25} {:<12} {:<8}", "ID", "Name", "Category", "Price")?;
    for it in &available {
        writeln!(out, "{:<5} {:<25} {:<12} {:<8}", it.id, it.name, it.category, it.price)?;
    }

    loop {
        if draft.is_full() {
            writeln!(p.out(), "Reached maximum items per order ({}).", MAX_ITEMS_PER_ORDER)?;
            break;
        }
        let id = or_quit!(p.parse::<u32>("\nEnter menu item ID to add (0 to finish): "));
        if id == 0 {
            break;
        }
        let Some(item) = menu.iter().find(|i| i.id == id) else {
            writeln!(p.out(), "Item with ID {} not found.", id)?;
            continue;
        };
        if !item.available {
            writeln!(p.out(), "Item '{}' is currently not available.", item.name)?;
            continue;
        }
        let qty = or_quit!(p.parse_with("Quantity: ", |s| match s.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err("quantity must be a positive number".into()),
        }));
        match or_report!(p, draft.add(item, qty)) {
            AddLine::Added => writeln!(p.out(), "Added {} x{} to order.", item.name, qty)?,
            AddLine::Unavailable => {
                writeln!(p.out(), "Item '{}' is currently not available.", item.name)?
            }
            AddLine::Full => {
                writeln!(p.out(), "Reached maximum items per order ({}).", MAX_ITEMS_PER_ORDER)?;
                break;
            }
        }

        let more = or_quit!(p.line("Add more items? (1 = yes, 0 = no): "));
        match more.trim() {
            "1" => {}
            "0" => break,
            _ => {
                writeln!(p.out(), "Assuming no.")?;
                break;
            }
        }
    }

    if draft.is_empty() {
        writeln!(p.out(), "No items in order. Cancelled.")?;
        return Ok(Flow::Continue);
    }
    let order = or_report!(p, r.orders.place(draft));
    print_invoice(p.out(), &order, r.orders.tax_bps())?;
    writeln!(p.out(), "Order saved. Thank you!")?;
    Ok(Flow::Continue)
}
