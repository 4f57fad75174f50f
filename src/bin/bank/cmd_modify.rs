use anyhow::{anyhow, Result};

use flatrec::bank::{AccountKind, AccountUpdate, Ledger};
use flatrec::Cents;

pub fn exec(
    ledger: &Ledger,
    number: u32,
    name: String,
    kind: AccountKind,
    balance: Cents,
) -> Result<()> {
    let acc = ledger
        .modify(number, AccountUpdate { name, kind, balance })?
        .ok_or_else(|| anyhow!("account {} not found", number))?;
    println!(
        "Account {} modified: {} ({}), balance {}",
        acc.number, acc.name, acc.kind, acc.balance
    );
    Ok(())
}
