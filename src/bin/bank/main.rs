use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use flatrec::bank::Ledger;
use flatrec::{console, metrics};

mod cli;
mod util;
mod cmd_open;
mod cmd_deposit;
mod cmd_withdraw;
mod cmd_balance;
mod cmd_list;
mod cmd_close;
mod cmd_modify;

fn main() {
    // Interactive sessions keep the terminal quiet unless RUST_LOG says otherwise.
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
    let ledger = Ledger::open(&cfg);

    let res = match cli.cmd {
        None => {
            let mut p = console::stdio();
            console::bank::run(&ledger, &mut p).map_err(Into::into)
        }

        Some(cli::Cmd::Open { number, name, kind, initial_deposit }) =>
            cmd_open::exec(&ledger, number, name, kind, initial_deposit),

        Some(cli::Cmd::Deposit { number, amount }) =>
            cmd_deposit::exec(&ledger, number, amount),

        Some(cli::Cmd::Withdraw { number, amount }) =>
            cmd_withdraw::exec(&ledger, number, amount),

        Some(cli::Cmd::Balance { number, json }) =>
            cmd_balance::exec(&ledger, number, json),

        Some(cli::Cmd::List { json }) =>
            cmd_list::exec(&ledger, json),

        Some(cli::Cmd::Close { number }) =>
            cmd_close::exec(&ledger, number),

        Some(cli::Cmd::Modify { number, name, kind, balance }) =>
            cmd_modify::exec(&ledger, number, name, kind, balance),
    };

    log::debug!("metrics: {:?}", metrics::snapshot());
    res
}
