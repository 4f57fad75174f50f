use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use flatrec::bank::{AccountKind, AccountUpdate, Ledger, NewAccount, Withdrawal};
use flatrec::{Cents, FlatConfig};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("flatrec-bank-{prefix}-{pid}-{t}-{id}"))
}

fn ledger(root: &PathBuf) -> Ledger {
    Ledger::open(&FlatConfig::default().with_data_dir(root).with_fsync(false))
}

fn money(s: &str) -> Cents {
    Cents::parse(s).unwrap()
}

fn open(l: &Ledger, number: u32, name: &str, kind: AccountKind, deposit: &str) -> Result<()> {
    l.open_account(NewAccount {
        number,
        name: name.to_string(),
        kind,
        initial_deposit: money(deposit),
    })?;
    Ok(())
}

#[test]
fn open_deposit_withdraw_balance() -> Result<()> {
    let root = unique_root("flow");
    let l = ledger(&root);
    open(&l, 7, "Ada", AccountKind::Savings, "100.00")?;

    let acc = l.deposit(7, money("12.50"))?.expect("account 7");
    assert_eq!(acc.balance, money("112.50"));

    match l.withdraw(7, money("0.50"))?.expect("account 7") {
        Withdrawal::Done(acc) => assert_eq!(acc.balance, money("112.00")),
        other => panic!("unexpected {other:?}"),
    }
    let acc = l.balance(7)?.expect("account 7");
    assert_eq!(acc.name, "Ada");
    assert_eq!(acc.kind, AccountKind::Savings);
    assert_eq!(acc.balance.to_string(), "112.00");

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn deposit_then_withdraw_same_amount_is_exact() -> Result<()> {
    let root = unique_root("exact");
    let l = ledger(&root);
    open(&l, 1, "Bo", AccountKind::Current, "0.30")?;
    for amt in ["0.10", "0.20", "1234.56", "0.01"] {
        l.deposit(1, money(amt))?;
        l.withdraw(1, money(amt))?;
        assert_eq!(l.balance(1)?.expect("account 1").balance, money("0.30"));
    }
    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn overdraft_leaves_balance_untouched() -> Result<()> {
    let root = unique_root("overdraft");
    let l = ledger(&root);
    open(&l, 3, "Cy", AccountKind::Savings, "10")?;
    let before = fs::read(root.join("accounts.dat"))?;

    let res = l.withdraw(3, money("10.01"))?.expect("account 3");
    assert_eq!(res, Withdrawal::Insufficient { balance: money("10") });
    assert_eq!(fs::read(root.join("accounts.dat"))?, before);

    // the whole balance can be taken
    assert!(matches!(l.withdraw(3, money("10"))?, Some(Withdrawal::Done(_))));
    assert_eq!(l.balance(3)?.expect("account 3").balance, Cents::ZERO);

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn unknown_account_is_none() -> Result<()> {
    let root = unique_root("missing");
    let l = ledger(&root);
    assert!(l.deposit(9, money("1"))?.is_none());
    assert!(l.withdraw(9, money("1"))?.is_none());
    assert!(l.balance(9)?.is_none());
    assert!(!l.close(9)?);
    let upd = AccountUpdate {
        name: "X".into(),
        kind: AccountKind::Current,
        balance: Cents::ZERO,
    };
    assert!(l.modify(9, upd)?.is_none());
    Ok(())
}

#[test]
fn invalid_input_is_rejected() -> Result<()> {
    let root = unique_root("invalid");
    let l = ledger(&root);
    open(&l, 1, "Di", AccountKind::Savings, "5")?;

    assert!(open(&l, 1, "Again", AccountKind::Savings, "5").is_err());
    assert!(open(&l, 2, "", AccountKind::Savings, "5").is_err());
    assert!(open(&l, 2, &"x".repeat(101), AccountKind::Savings, "5").is_err());
    assert!(open(&l, 2, "Neg", AccountKind::Savings, "-1").is_err());
    assert!(l.deposit(1, Cents::ZERO).is_err());
    assert!(l.deposit(1, money("-3")).is_err());
    assert!(l.withdraw(1, Cents::ZERO).is_err());

    assert_eq!(l.list()?.len(), 1);
    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn close_and_modify() -> Result<()> {
    let root = unique_root("close");
    let l = ledger(&root);
    open(&l, 1, "A", AccountKind::Savings, "1")?;
    open(&l, 2, "B", AccountKind::Current, "2")?;
    open(&l, 3, "C", AccountKind::Savings, "3")?;

    assert!(l.close(2)?);
    let numbers: Vec<u32> = l.list()?.iter().map(|a| a.number).collect();
    assert_eq!(numbers, vec![1, 3]);

    let acc = l
        .modify(
            3,
            AccountUpdate {
                name: "  Carla ".into(),
                kind: AccountKind::Current,
                balance: money("-4.25"),
            },
        )?
        .expect("account 3");
    assert_eq!(acc.name, "Carla");
    assert_eq!(acc.kind, AccountKind::Current);
    assert_eq!(acc.balance, money("-4.25"));
    assert_eq!(l.balance(3)?.expect("account 3"), acc);

    // number 2 is free again for a new account
    open(&l, 2, "B2", AccountKind::Savings, "0")?;
    assert_eq!(l.list()?.len(), 3);

    fs::remove_dir_all(&root).ok();
    Ok(())
}
