use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

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
