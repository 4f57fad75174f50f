use anyhow::{anyhow, Result};

use flatrec::bank::Ledger;
use flatrec::Cents;

pub fn exec(ledger: &Ledger, number: u32, amount: Cents) -> Result<()> {
    let acc = ledger
        .deposit(number, amount)?
        .ok_or_else(|| anyhow!("account {} not found", number))?;
    println!("Deposited {}. New balance: {}", amount, acc.balance);
    Ok(())
}
