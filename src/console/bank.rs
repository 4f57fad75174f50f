//! Banking record system menu (options 1-8).

use std::io::{self, BufRead, Write};

use crate::bank::{AccountKind, AccountUpdate, Ledger, NewAccount, Withdrawal};
use crate::money::Cents;

use super::prompt::{or_quit, or_report, Flow, Prompter};

pub fn run<R: BufRead, W: Write>(ledger: &Ledger, p: &mut Prompter<R, W>) -> io::Result<()> {
    loop {
        let out = p.out();
        writeln!(out, "\n\n\t\t\t\tBANKING RECORD SYSTEM")?;
        writeln!(out, "\t\t\t\t---------------------")?;
        write!(out, "\nMAIN MENU")?;
        write!(out, "\n01. NEW ACCOUNT")?;
        write!(out, "\n02. DEPOSIT AMOUNT")?;
        write!(out, "\n03. WITHDRAW AMOUNT")?;
        write!(out, "\n04. BALANCE ENQUIRY")?;
        write!(out, "\n05. ALL ACCOUNT HOLDER LIST")?;
        write!(out, "\n06. CLOSE AN ACCOUNT")?;
        write!(out, "\n07. MODIFY AN ACCOUNT")?;
        write!(out, "\n08. EXIT")?;

        let Some(choice) = p.parse::<u32>("\n\nSelect Your Option <1-8>: ")? else {
            return Ok(());
        };
        let flow = match choice {
            1 => new_account(ledger, p)?,
            2 => deposit(ledger, p)?,
            3 => withdraw(ledger, p)?,
            4 => balance_enquiry(ledger, p)?,
            5 => list_accounts(ledger, p)?,
            6 => close_account(ledger, p)?,
            7 => modify_account(ledger, p)?,
            8 => {
                writeln!(p.out(), "Exiting the system. Goodbye!")?;
                Flow::Quit
            }
            _ => {
                writeln!(p.out(), "Enter a valid option (1-8).")?;
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            return Ok(());
        }
    }
}

fn ask_number<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    prompt: &str,
) -> io::Result<Option<u32>> {
    p.parse::<u32>(prompt)
}

fn new_account<R: BufRead, W: Write>(ledger: &Ledger, p: &mut Prompter<R, W>) -> io::Result<Flow> {
    let number = or_quit!(ask_number(p, "Enter Account Number: "));
    let name = or_quit!(p.line("Enter Name: "));
    let kind: AccountKind =
        or_quit!(p.parse("Enter Account Type (S for Savings / C for Current): "));
    let initial_deposit: Cents = or_quit!(p.parse("Enter Initial Deposit: "));

    or_report!(
        p,
        ledger.open_account(NewAccount {
            number,
            name,
            kind,
            initial_deposit,
        })
    );
    writeln!(p.out(), "Account created successfully.")?;
    Ok(Flow::Continue)
}

fn deposit<R: BufRead, W: Write>(ledger: &Ledger, p: &mut Prompter<R, W>) -> io::Result<Flow> {
    let number = or_quit!(ask_number(p, "Enter Account Number: "));
    if or_report!(p, ledger.balance(number)).is_none() {
        writeln!(p.out(), "Account not found.")?;
        return Ok(Flow::Continue);
    }
    let amount: Cents = or_quit!(p.parse("Enter amount to deposit: "));
    match or_report!(p, ledger.deposit(number, amount)) {
        Some(acc) => writeln!(
            p.out(),
            "Amount deposited successfully. New Balance: {}",
            acc.balance
        )?,
        None => writeln!(p.out(), "Account not found.")?,
    }
    Ok(Flow::Continue)
}

fn withdraw<R: BufRead, W: Write>(ledger: &Ledger, p: &mut Prompter<R, W>) -> io::Result<Flow> {
    let number = or_quit!(ask_number(p, "Enter Account Number: "));
    if or_report!(p, ledger.balance(number)).is_none() {
        writeln!(p.out(), "Account not found.")?;
        return Ok(Flow::Continue);
    }
    let amount: Cents = or_quit!(p.parse("Enter amount to withdraw: "));
    match or_report!(p, ledger.withdraw(number, amount)) {
        Some(Withdrawal::Done(acc)) => writeln!(
            p.out(),
            "Amount withdrawn successfully. New Balance: {}",
            acc.balance
        )?,
        Some(Withdrawal::Insufficient { .. }) => writeln!(p.out(), "Insufficient balance.")?,
        None => writeln!(p.out(), "Account not found.")?,
    }
    Ok(Flow::Continue)
}

fn balance_enquiry<R: BufRead, W: Write>(
    ledger: &Ledger,
    p: &mut Prompter<R, W>,
) -> io::Result<Flow> {
    let number = or_quit!(ask_number(p, "Enter Account Number: "));
    match or_report!(p, ledger.balance(number)) {
        Some(acc) => writeln!(
            p.out(),
            "\nAccount Number: {}\nName: {}\nAccount Type: {}\nBalance: {}",
            acc.number,
            acc.name,
            acc.kind.code() as char,
            acc.balance
        )?,
        None => writeln!(p.out(), "Account not found.")?,
    }
    Ok(Flow::Continue)
}

fn list_accounts<R: BufRead, W: Write>(
    ledger: &Ledger,
    p: &mut Prompter<R, W>,
) -> io::Result<Flow> {
    let accounts = or_report!(p, ledger.list());
    let out = p.out();
    writeln!(
        out,
        "\n{:<15} {:<25} {:<15} {:<10}",
        "Account No", "Name", "Type", "Balance"
    )?;
    writeln!(
        out,
        "---------------------------------------------------------------------"
    )?;
    for acc in &accounts {
        writeln!(
            out,
            "{:<15} {:<25} {:<15} {:<10}",
            acc.number,
            acc.name,
            acc.kind.code() as char,
            acc.balance
        )?;
    }
    Ok(Flow::Continue)
}

fn close_account<R: BufRead, W: Write>(
    ledger: &Ledger,
    p: &mut Prompter<R, W>,
) -> io::Result<Flow> {
    let number = or_quit!(ask_number(p, "Enter Account Number to close: "));
    if or_report!(p, ledger.close(number)) {
        writeln!(p.out(), "Account closed successfully.")?;
    } else {
        writeln!(p.out(), "Account not found.")?;
    }
    Ok(Flow::Continue)
}

fn modify_account<R: BufRead, W: Write>(
    ledger: &Ledger,
    p: &mut Prompter<R, W>,
) -> io::Result<Flow> {
    let number = or_quit!(ask_number(p, "Enter Account Number to modify: "));
    if or_report!(p, ledger.balance(number)).is_none() {
        writeln!(p.out(), "Account not found.")?;
        return Ok(Flow::Continue);
    }
    let name = or_quit!(p.line("Enter New Name: "));
    let kind: AccountKind = or_quit!(p.parse("Enter New Account Type (S/C): "));
    let balance: Cents = or_quit!(p.parse("Enter New Balance: "));

    match or_report!(p, ledger.modify(number, AccountUpdate { name, kind, balance })) {
        Some(_) => writeln!(p.out(), "Account modified successfully.")?,
        None => writeln!(p.out(), "Account not found.")?,
    }
    Ok(Flow::Continue)
}
