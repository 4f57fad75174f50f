//! Admin password (admin.dat): a single-record store.

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::codec::{check_text, read_fixed_str, write_fixed_str, FixedRecord};
use crate::config::FlatConfig;
use crate::consts::{ADMIN_FILE, PASSWORD_LEN, TAG_ADMIN};
use crate::store::RecordStore;

const ADMIN_KEY: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminCredential {
    #[serde(skip_serializing)]
    pub password: String,
}

impl FixedRecord for AdminCredential {
    const TAG: &'static [u8; 4] = TAG_ADMIN;
    const SIZE: usize = PASSWORD_LEN;

    fn key(&self) -> u64 {
        ADMIN_KEY
    }

    fn encode(&self, out: &mut [u8]) -> Result<()> {
        let mut w = out;
        write_fixed_str(&mut w, &self.password, PASSWORD_LEN)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = buf;
        let password = read_fixed_str(&mut r, PASSWORD_LEN)?;
        Ok(Self { password })
    }
}

pub struct AdminAuth {
    store: RecordStore<AdminCredential>,
    default_password: String,
}

impl AdminAuth {
    pub fn open(cfg: &FlatConfig) -> Self {
        Self::with_store(
            RecordStore::new(cfg.file(ADMIN_FILE)).with_fsync(cfg.fsync),
            cfg.admin_default_password.clone(),
        )
    }

    pub fn with_store(store: RecordStore<AdminCredential>, default_password: String) -> Self {
        Self {
            store,
            default_password,
        }
    }

    pub fn store(&self) -> &RecordStore<AdminCredential> {
        &self.store
    }

    /// Write the default credential if admin.dat is missing or empty.
    pub fn ensure(&self) -> Result<()> {
        if self.store.count()? > 0 {
            return Ok(());
        }
        check_text("admin password", &self.default_password, PASSWORD_LEN)?;
        self.store.append(&AdminCredential {
            password: self.default_password.clone(),
        })?;
        log::info!("initialized admin credential in {}", self.store.path().display());
        Ok(())
    }

    fn current(&self) -> Result<AdminCredential> {
        self.ensure()?;
        self.store
            .find_by_key(ADMIN_KEY)?
            .map(|f| f.record)
            .ok_or_else(|| anyhow!("no admin credential in {}", self.store.path().display()))
    }

    pub fn verify(&self, entered: &str) -> Result<bool> {
        let ok = self.current()?.password == entered;
        if !ok {
            log::warn!("admin login refused");
        }
        Ok(ok)
    }

    /// Replace the stored password. An empty password is refused with `false`.
    pub fn change_password(&self, new_password: &str) -> Result<bool> {
        if new_password.is_empty() {
            return Ok(false);
        }
        check_text("admin password", new_password, PASSWORD_LEN)?;
        self.store.rewrite_all(&[AdminCredential {
            password: new_password.to_string(),
        }])?;
        log::info!("admin password changed");
        Ok(true)
    }
}
