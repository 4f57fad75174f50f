//! Ledger: banking operations over accounts.dat.
//!
//! Not-found is `None`/`false`; an overdraft attempt is `Withdrawal::Insufficient`
//! and leaves the file untouched. Input validation errors are `Err`.

use anyhow::{anyhow, Result};

use crate::codec::check_text;
use crate::config::FlatConfig;
use crate::consts::{ACCOUNTS_FILE, ACCOUNT_NAME_LEN};
use crate::money::Cents;
use crate::store::{Edit, RecordStore};

use super::account::{Account, AccountKind};

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub number: u32,
    pub name: String,
    pub kind: AccountKind,
    pub initial_deposit: Cents,
}

/// Replacement values for `modify`.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub name: String,
    pub kind: AccountKind,
    pub balance: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Withdrawal {
    Done(Account),
    Insufficient { balance: Cents },
}

pub struct Ledger {
    store: RecordStore<Account>,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow!("account name must not be empty"));
    }
    check_text("account name", name, ACCOUNT_NAME_LEN)
}

fn require_positive(amount: Cents, what: &str) -> Result<()> {
    if !amount.is_positive() {
        return Err(anyhow!("{} amount must be greater than zero, got {}", what, amount));
    }
    Ok(())
}

impl Ledger {
    pub fn open(cfg: &FlatConfig) -> Self {
        Self::with_store(RecordStore::new(cfg.file(ACCOUNTS_FILE)).with_fsync(cfg.fsync))
    }

    pub fn with_store(store: RecordStore<Account>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<Account> {
        &self.store
    }

    /// Create an account. The number must not be in use yet.
    pub fn open_account(&self, new: NewAccount) -> Result<Account> {
        validate_name(&new.name)?;
        if new.initial_deposit.is_negative() {
            return Err(anyhow!(
                "initial deposit must not be negative, got {}",
                new.initial_deposit
            ));
        }
        if self.store.find_by_key(u64::from(new.number))?.is_some() {
            return Err(anyhow!("account {} already exists", new.number));
        }
        let acc = Account {
            number: new.number,
            name: new.name.trim().to_string(),
            kind: new.kind,
            balance: new.initial_deposit,
        };
        self.store.append(&acc)?;
        log::info!("opened account {} ({})", acc.number, acc.kind);
        Ok(acc)
    }

    /// Add `amount` to the balance. Returns the updated account.
    pub fn deposit(&self, number: u32, amount: Cents) -> Result<Option<Account>> {
        require_positive(amount, "deposit")?;
        self.store.update_by_key(u64::from(number), |acc| {
            acc.balance = acc
                .balance
                .checked_add(amount)
                .ok_or_else(|| anyhow!("balance overflow on account {}", number))?;
            Ok(Edit::Commit(acc.clone()))
        })
    }

    /// Take `amount` from the balance if it covers it.
    pub fn withdraw(&self, number: u32, amount: Cents) -> Result<Option<Withdrawal>> {
        require_positive(amount, "withdrawal")?;
        self.store.update_by_key(u64::from(number), |acc| {
            if acc.balance < amount {
                return Ok(Edit::Discard(Withdrawal::Insufficient {
                    balance: acc.balance,
                }));
            }
            acc.balance = acc
                .balance
                .checked_sub(amount)
                .ok_or_else(|| anyhow!("balance underflow on account {}", number))?;
            Ok(Edit::Commit(Withdrawal::Done(acc.clone())))
        })
    }

    pub fn balance(&self, number: u32) -> Result<Option<Account>> {
        Ok(self
            .store
            .find_by_key(u64::from(number))?
            .map(|found| found.record))
    }

    pub fn list(&self) -> Result<Vec<Account>> {
        self.store.scan_all()
    }

    /// Remove the account. Returns false if no such account existed.
    pub fn close(&self, number: u32) -> Result<bool> {
        Ok(self.store.rebuild_excluding(u64::from(number))? > 0)
    }

    /// Replace name, type and balance of an account.
    pub fn modify(&self, number: u32, upd: AccountUpdate) -> Result<Option<Account>> {
        validate_name(&upd.name)?;
        self.store.update_by_key(u64::from(number), |acc| {
            acc.name = upd.name.trim().to_string();
            acc.kind = upd.kind;
            acc.balance = upd.balance;
            Ok(Edit::Commit(acc.clone()))
        })
    }
}
