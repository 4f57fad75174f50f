use anyhow::{anyhow, Result};

use flatrec::bank::{Ledger, Withdrawal};
use flatrec::Cents;

pub fn exec(ledger: &Ledger, number: u32, amount: Cents) -> Result<()> {
    match ledger.withdraw(number, amount)? {
        Some(Withdrawal::Done(acc)) => {
            println!("Withdrew {}. New balance: {}", amount, acc.balance);
            Ok(())
        }
        Some(Withdrawal::Insufficient { balance }) => Err(anyhow!(
            "insufficient balance on account {}: {} available, {} requested",
            number,
            balance,
            amount
        )),
        None => Err(anyhow!("account {} not found", number)),
    }
}
