use anyhow::{anyhow, Result};

use flatrec::bank::Ledger;

use super::util::print_json;

pub fn exec(ledger: &Ledger, number: u32, json: bool) -> Result<()> {
    let acc = ledger
        .balance(number)?
        .ok_or_else(|| anyhow!("account {} not found", number))?;
    if json {
        return print_json(&acc);
    }
    println!("Account Number: {}", acc.number);
    println!("Name: {}", acc.name);
    println!("Account Type: {}", acc.kind);
    println!("Balance: {}", acc.balance);
    Ok(())
}
