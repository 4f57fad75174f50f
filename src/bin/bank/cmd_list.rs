use anyhow::Result;

use flatrec::bank::Ledger;

use super::util::print_json;

pub fn exec(ledger: &Ledger, json: bool) -> Result<()> {
    let accounts = ledger.list()?;
    if json {
        return print_json(&accounts);
    }
    println!("{:<15} {:<25} {:<10} {:>12}", "Account No", "Name", "Type", "Balance");
    for acc in &accounts {
        println!(
            "{:<15} {:<25} {:<10} {:>12}",
            acc.number, acc.name, acc.kind, acc.balance
        );
    }
    println!("{} account(s)", accounts.len());
    Ok(())
}
