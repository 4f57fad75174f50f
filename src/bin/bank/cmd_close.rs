use anyhow::{anyhow, Result};

use flatrec::bank::Ledger;

pub fn exec(ledger: &Ledger, number: u32) -> Result<()> {
    if !ledger.close(number)? {
        return Err(anyhow!("account {} not found", number));
    }
    println!("Account {} closed.", number);
    Ok(())
}
