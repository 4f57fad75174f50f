use clap::{Parser, Subcommand};
use std::path::PathBuf;

use flatrec::bank::AccountKind;
use flatrec::Cents;

/// Banking record system. Without a subcommand runs the interactive menu.
#[derive(Parser, Debug)]
#[command(name = "bank", version, about = "Banking record system over accounts.dat")]
pub struct Cli {
    /// Directory holding accounts.dat (overrides FLATREC_DATA_DIR)
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
    /// Open a new account
    Open {
        #[arg(long)]
        number: u32,
        #[arg(long)]
        name: String,
        /// S (savings) or C (current)
        #[arg(long)]
        kind: AccountKind,
        #[arg(long, default_value = "0")]
        initial_deposit: Cents,
    },
    /// Deposit into an account
    Deposit {
        #[arg(long)]
        number: u32,
        #[arg(long)]
        amount: Cents,
    },
    /// Withdraw from an account
    Withdraw {
        #[arg(long)]
        number: u32,
        #[arg(long)]
        amount: Cents,
    },
    /// Balance enquiry
    Balance {
        #[arg(long)]
        number: u32,
        #[arg(long)]
        json: bool,
    },
    /// All account holders
    List {
        #[arg(long)]
        json: bool,
    },
    /// Close (delete) an account
    Close {
        #[arg(long)]
        number: u32,
    },
    /// Replace name, type and balance of an account
    Modify {
        #[arg(long)]
        number: u32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        kind: AccountKind,
        /// Use --balance=-5 for negative values
        #[arg(long)]
        balance: Cents,
    },
}
