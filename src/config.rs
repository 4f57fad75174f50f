//! Centralized configuration for the flat-file stores and the programs on top.
//!
//! - FlatConfig::from_env() reads FLATREC_* variables, anything unset keeps its default.
//! - Fluent `with_*` setters let binaries apply CLI overrides on top of env.
//! - Services take `&FlatConfig` and derive their file paths from `data_dir`.

use std::fmt;
use std::path::PathBuf;

use crate::consts::{ADMIN_DEFAULT_PASSWORD, DEFAULT_TAX_BPS};

#[derive(Clone, Debug)]
pub struct FlatConfig {
    /// Directory holding accounts.dat, menu.dat, orders.dat and admin.dat.
    /// Env: FLATREC_DATA_DIR (default ".")
    pub data_dir: PathBuf,

    /// fsync store files after every write, plus the parent dir after a rename.
    /// Env: FLATREC_FSYNC (default true; "0|false|off|no" => false)
    pub fsync: bool,

    /// Order tax rate in basis points (500 = 5%).
    /// Env: FLATREC_TAX_BPS (default 500)
    pub tax_bps: u32,

    /// Password written to admin.dat on first run.
    /// Env: FLATREC_ADMIN_DEFAULT_PASSWORD (default "admin123")
    pub admin_default_password: String,
}

impl Default for FlatConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            fsync: true,
            tax_bps: DEFAULT_TAX_BPS,
            admin_default_password: ADMIN_DEFAULT_PASSWORD.to_string(),
        }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl FlatConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("FLATREC_DATA_DIR") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.data_dir = PathBuf::from(s);
            }
        }

        if let Ok(v) = std::env::var("FLATREC_FSYNC") {
            match parse_flag(&v) {
                Some(on) => cfg.fsync = on,
                None => log::warn!("ignoring FLATREC_FSYNC={:?} (expected 1|0|true|false)", v),
            }
        }

        if let Ok(v) = std::env::var("FLATREC_TAX_BPS") {
            match v.trim().parse::<u32>() {
                Ok(n) => cfg.tax_bps = n,
                Err(_) => log::warn!("ignoring FLATREC_TAX_BPS={:?} (expected integer)", v),
            }
        }

        if let Ok(v) = std::env::var("FLATREC_ADMIN_DEFAULT_PASSWORD") {
            if !v.is_empty() {
                cfg.admin_default_password = v;
            }
        }

        cfg
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_fsync(mut self, on: bool) -> Self {
        self.fsync = on;
        self
    }

    pub fn with_tax_bps(mut self, bps: u32) -> Self {
        self.tax_bps = bps;
        self
    }

    pub fn with_admin_default_password<S: Into<String>>(mut self, pass: S) -> Self {
        self.admin_default_password = pass.into();
        self
    }

    /// Path of a store file inside the data dir.
    pub fn file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}

impl fmt::Display for FlatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print admin_default_password
        write!(
            f,
            "FlatConfig {{ data_dir: {}, fsync: {}, tax_bps: {} }}",
            self.data_dir.display(),
            self.fsync,
            self.tax_bps,
        )
    }
}
