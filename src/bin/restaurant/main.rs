use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use flatrec::restaurant::{MenuItemPatch, Restaurant};
use flatrec::{console, metrics};

mod cli;
mod util;
mod cmd_menu;
mod cmd_order;
mod cmd_orders;
mod cmd_passwd;

fn main() {
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    let cfg = util::load_config(cli.data_dir, cli.no_fsync);
    log::debug!("{}", cfg);
    let r = Restaurant::open(&cfg);

    let res = match cli.cmd {
        None => {
            let mut p = console::stdio();
            console::restaurant::run(&r, &mut p).map_err(Into::into)
        }

        Some(cli::Cmd::Menu { all, json }) =>
            cmd_menu::exec_show(&r, all, json),

        Some(cli::Cmd::MenuAdd { password, name, category, price }) =>
            cmd_menu::exec_add(&r, password, name, category, price),

        Some(cli::Cmd::MenuUpdate { password, id, name, category, price, available }) => {
            let patch = MenuItemPatch { name, category, price, available };
            cmd_menu::exec_update(&r, password, id, patch)
        }

        Some(cli::Cmd::Order { customer, items, json }) =>
            cmd_order::exec(&r, customer, items, json),

        Some(cli::Cmd::Orders { password, json }) =>
            cmd_orders::exec(&r, password, json),

        Some(cli::Cmd::Passwd { password, new_password }) =>
            cmd_passwd::exec(&r, password, new_password),
    };

    log::debug!("metrics: {:?}", metrics::snapshot());
    res
}
