use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::PathBuf;

use flatrec::restaurant::Restaurant;
use flatrec::FlatConfig;

/// Env config with command-line overrides applied on top.
pub fn load_config(data_dir: Option<PathBuf>, no_fsync: bool) -> FlatConfig {
    let mut cfg = FlatConfig::from_env();
    if let Some(dir) = data_dir {
        cfg = cfg.with_data_dir(dir);
    }
    if no_fsync {
        cfg = cfg.with_fsync(false);
    }
    cfg
}

pub fn print_json<T: Serialize + ?Sized>(v: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

/// `ID:QTY` as given to `order --item`.
pub fn parse_item_spec(s: &str) -> std::result::Result<(u32, u32), String> {
    let (id, qty) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ID:QTY, got {:?}", s))?;
    let id = id
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad item id {:?}: {}", id, e))?;
    let qty = qty
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad quantity {:?}: {}", qty, e))?;
    if qty == 0 {
        return Err("quantity must be greater than zero".into());
    }
    Ok((id, qty))
}

/// Fail unless `password` matches the stored admin credential.
pub fn require_admin(r: &Restaurant, password: &str) -> Result<()> {
    if !r.admin.verify(password)? {
        return Err(anyhow!("admin login failed"));
    }
    Ok(())
}
