use clap::{Parser, Subcommand};
use std::path::PathBuf;

use flatrec::Cents;

use super::util::parse_item_spec;

/// Restaurant management. Without a subcommand runs the interactive menu.
#[derive(Parser, Debug)]
#[command(name = "restaurant", version, about = "Restaurant menu and order manager")]
pub struct Cli {
    /// Directory holding menu.dat, orders.dat and admin.dat (overrides FLATREC_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Skip fsync after writes
    #[arg(long, global = true)]
    pub no_fsync: bool,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Show the menu (available items only unless --all)
    Menu {
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// Add a menu item (admin)
    MenuAdd {
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        price: Cents,
    },
    /// Update fields of a menu item (admin); omitted fields are kept
    MenuUpdate {
        #[arg(long)]
        password: String,
        #[arg(long)]
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        price: Option<Cents>,
        #[arg(long)]
        available: Option<bool>,
    },
    /// Place an order, e.g. --customer Ann --item 1:2 --item 2:1
    Order {
        #[arg(long)]
        customer: String,
        /// Menu item as ID:QTY, repeatable
        #[arg(long = "item", value_parser = parse_item_spec, required = true)]
        items: Vec<(u32, u32)>,
        #[arg(long)]
        json: bool,
    },
    /// Order history (admin)
    Orders {
        #[arg(long)]
        password: String,
        #[arg(long)]
        json: bool,
    },
    /// Change the admin password (admin)
    Passwd {
        #[arg(long)]
        password: String,
        #[arg(long)]
        new_password: String,
    },
}
