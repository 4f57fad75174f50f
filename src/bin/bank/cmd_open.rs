use anyhow::Result;

use flatrec::bank::{AccountKind, Ledger, NewAccount};
use flatrec::Cents;

pub fn exec(
    ledger: &Ledger,
    number: u32,
    name: String,
    kind: AccountKind,
    initial_deposit: Cents,
) -> Result<()> {
    let acc = ledger.open_account(NewAccount {
        number,
        name,
        kind,
        initial_deposit,
    })?;
    println!(
        "Account {} created ({}, balance {}).",
        acc.number, acc.kind, acc.balance
    );
    Ok(())
}
