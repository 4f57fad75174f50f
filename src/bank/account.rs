//! Account record (accounts.dat).
//!
//! Payload layout (113 B, LE):
//!   [number u32][name 100][kind u8 'S'|'C'][balance_cents i64]

use anyhow::{anyhow, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::codec::{read_fixed_str, write_fixed_str, FixedRecord};
use crate::consts::{ACCOUNT_NAME_LEN, TAG_ACCOUNT};
use crate::money::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccountKind {
    Savings,
    Current,
}

impl AccountKind {
    /// Single-byte tag stored on disk.
    pub fn code(self) -> u8 {
        match self {
            AccountKind::Savings => b'S',
            AccountKind::Current => b'C',
        }
    }

    pub fn from_code(b: u8) -> Result<Self> {
        match b.to_ascii_uppercase() {
            b'S' => Ok(AccountKind::Savings),
            b'C' => Ok(AccountKind::Current),
            other => Err(anyhow!(
                "unknown account type {:?} (expected S or C)",
                other as char
            )),
        }
    }
}

impl FromStr for AccountKind {
    type Err = anyhow::Error;

    /// Accepts "S", "c", "savings", "Current".
    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim();
        match t.to_ascii_lowercase().as_str() {
            "savings" => Ok(AccountKind::Savings),
            "current" => Ok(AccountKind::Current),
            _ if t.len() == 1 => AccountKind::from_code(t.as_bytes()[0]),
            _ => Err(anyhow!("unknown account type {:?} (expected S or C)", t)),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            AccountKind::Savings => "Savings",
            AccountKind::Current => "Current",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub number: u32,
    pub name: String,
    pub kind: AccountKind,
    pub balance: Cents,
}

impl FixedRecord for Account {
    const TAG: &'static [u8; 4] = TAG_ACCOUNT;
    const SIZE: usize = 4 + ACCOUNT_NAME_LEN + 1 + 8;

    fn key(&self) -> u64 {
        u64::from(self.number)
    }

    fn encode(&self, out: &mut [u8]) -> Result<()> {
        let mut w = out;
        w.write_u32::<LittleEndian>(self.number)?;
        write_fixed_str(&mut w, &self.name, ACCOUNT_NAME_LEN)?;
        w.write_u8(self.kind.code())?;
        w.write_i64::<LittleEndian>(self.balance.cents())?;
        Ok(())
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = buf;
        let number = r.read_u32::<LittleEndian>()?;
        let name = read_fixed_str(&mut r, ACCOUNT_NAME_LEN)?;
        let kind = AccountKind::from_code(r.read_u8()?)?;
        let balance = Cents::from_cents(r.read_i64::<LittleEndian>()?);
        Ok(Self {
            number,
            name,
            kind,
            balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_slot, encode_slot};

    #[test]
    fn account_slot_roundtrip() {
        let a = Account {
            number: 1001,
            name: "Ada Lovelace".into(),
            kind: AccountKind::Current,
            balance: Cents::from_cents(-250),
        };
        let slot = encode_slot(&a).unwrap();
        assert_eq!(slot.len(), Account::SIZE + 4);
        assert_eq!(decode_slot::<Account>(&slot).unwrap(), a);
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("s".parse::<AccountKind>().unwrap(), AccountKind::Savings);
        assert_eq!("Current".parse::<AccountKind>().unwrap(), AccountKind::Current);
        assert!("x".parse::<AccountKind>().is_err());
        assert!("checking".parse::<AccountKind>().is_err());
    }
}
