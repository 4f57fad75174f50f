//! Money: exact currency amounts as integer cents.
//!
//! Balances, prices and order totals are all `Cents`. User input is parsed with
//! `rust_decimal` and rounded half away from zero to two decimal places, so a
//! deposit followed by a withdrawal of the same text amount is exact.

use anyhow::{anyhow, Result};
use rust_decimal::prelude::*;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    #[inline]
    pub const fn from_cents(c: i64) -> Self {
        Cents(c)
    }

    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Parse "12", "12.5", "-3.14", "0.005" (-> 0.01).
    pub fn parse(s: &str) -> Result<Self> {
        let t = s.trim();
        if t.is_empty() {
            return Err(anyhow!("amount is empty"));
        }
        let d = Decimal::from_str(t).map_err(|e| anyhow!("invalid amount {:?}: {}", t, e))?;
        let r = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let c = r
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|d| d.to_i64())
            .ok_or_else(|| anyhow!("amount {:?} is out of range", t))?;
        Ok(Cents(c))
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, rhs: Cents) -> Option<Cents> {
        self.0.checked_add(rhs.0).map(Cents)
    }

    pub fn checked_sub(self, rhs: Cents) -> Option<Cents> {
        self.0.checked_sub(rhs.0).map(Cents)
    }

    /// Line amount: unit price times quantity.
    pub fn checked_times(self, qty: u32) -> Option<Cents> {
        self.0.checked_mul(i64::from(qty)).map(Cents)
    }

    /// `self * bps / 10000`, rounded half away from zero to a whole cent.
    pub fn apply_bps(self, bps: u32) -> Cents {
        let num = (self.0 as i128).abs() * i128::from(bps);
        let q = (num + 5_000) / 10_000;
        let q = if self.0 < 0 { -q } else { q };
        Cents(q.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

impl FromStr for Cents {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Cents::parse(s)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let s = format!("{}{}.{:02}", sign, abs / 100, abs % 100);
        // honour width/alignment from table layouts ("{:>10}")
        f.pad(&s)
    }
}

impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        assert_eq!(Cents::parse("12").unwrap(), Cents(1200));
        assert_eq!(Cents::parse(" 12.5 ").unwrap(), Cents(1250));
        assert_eq!(Cents::parse("7.33").unwrap(), Cents(733));
        assert_eq!(Cents::parse("0.005").unwrap(), Cents(1));
        assert_eq!(Cents::parse("-3.14").unwrap(), Cents(-314));
        assert_eq!(Cents(1250).to_string(), "12.50");
        assert_eq!(Cents(-5).to_string(), "-0.05");
        assert_eq!(format!("{:>8}", Cents(733)), "    7.33");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Cents::parse("").is_err());
        assert!(Cents::parse("abc").is_err());
        assert!(Cents::parse("1.2.3").is_err());
    }

    #[test]
    fn parse_rejects_out_of_range() {
        assert!(Cents::parse("1000000000000000000000000000").is_err());
        assert!(Cents::parse("-79228162514264337593543950335").is_err());
        assert!(Cents::parse("92233720368547758.08").is_err());
        assert_eq!(
            Cents::parse("92233720368547758.07").unwrap(),
            Cents(i64::MAX)
        );
    }

    #[test]
    fn bps_rounds_half_up() {
        // 27.33 * 5% = 1.3665 -> 1.37
        assert_eq!(Cents(2733).apply_bps(500), Cents(137));
        // 0.10 * 5% = 0.005 -> 0.01
        assert_eq!(Cents(10).apply_bps(500), Cents(1));
        assert_eq!(Cents(9).apply_bps(500), Cents(0));
        assert_eq!(Cents(-10).apply_bps(500), Cents(-1));
    }

    #[test]
    fn checked_arith() {
        assert_eq!(Cents(1000).checked_times(2), Some(Cents(2000)));
        assert_eq!(Cents(i64::MAX).checked_add(Cents(1)), None);
        assert_eq!(Cents(5).checked_sub(Cents(7)), Some(Cents(-2)));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let s = serde_json::to_string(&Cents(2870)).unwrap();
        assert_eq!(s, "\"28.70\"");
    }
}
