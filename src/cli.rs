//! `flatrec` tool: look inside store files without the programs that own them.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::bank::Account;
use crate::codec::FixedRecord;
use crate::metrics;
use crate::restaurant::{AdminCredential, MenuItem, Order};
use crate::store::{inspect, verify_file, RecordStore};

#[derive(Parser, Debug)]
#[command(
    name = "flatrec",
    version,
    about = "Inspect and verify fixed-record store files",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Header fields and record count
    Status {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Check every slot checksum; exits non-zero on corruption
    Verify {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Decode and print every record
    Dump {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, value_enum)]
        kind: DumpKind,
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DumpKind {
    Account,
    Menu,
    Order,
    Admin,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Status { path, json } => status(&path, json),
        Cmd::Verify { path, json } => verify(&path, json),
        Cmd::Dump { path, kind, json } => match kind {
            DumpKind::Account => dump::<Account>(&path, json),
            DumpKind::Menu => dump::<MenuItem>(&path, json),
            DumpKind::Order => dump::<Order>(&path, json),
            DumpKind::Admin => dump::<AdminCredential>(&path, json),
        },
    }
}

fn status(path: &Path, json: bool) -> Result<()> {
    let st = inspect(path)?;
    if json {
        let doc = serde_json::json!({
            "store": st,
            "metrics": metrics::snapshot(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }
    println!("Store at {}", st.path);
    println!("  tag          = {}", st.tag);
    println!("  version      = {}", st.version);
    println!("  slot_size    = {} bytes", st.slot_size);
    println!("  records      = {}", st.records);
    println!("  last_id      = {}", st.last_id);
    println!("  file_bytes   = {}", st.file_bytes);
    if st.torn_tail_bytes > 0 {
        println!("  torn_tail    = {} bytes", st.torn_tail_bytes);
    }
    Ok(())
}

fn verify(path: &Path, json: bool) -> Result<()> {
    let rep = verify_file(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rep)?);
    } else {
        println!("Verify {} ({})", rep.path, rep.tag);
        println!("  records      = {}", rep.records);
        println!("  ok           = {}", rep.ok);
        if !rep.crc_failures.is_empty() {
            println!("  bad slots    = {:?}", rep.crc_failures);
        }
        if rep.torn_tail_bytes > 0 {
            println!("  torn_tail    = {} bytes", rep.torn_tail_bytes);
        }
    }
    if rep.is_clean() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} is corrupt: {} bad slot(s), {} torn tail byte(s)",
            rep.path,
            rep.crc_failures.len(),
            rep.torn_tail_bytes
        ))
    }
}

#[derive(Serialize)]
struct DumpRow<'a, T> {
    pos: u64,
    key: u64,
    record: &'a T,
}

fn dump<T: FixedRecord + Serialize>(path: &Path, json: bool) -> Result<()> {
    let store = RecordStore::<T>::new(path);
    let mut rows = Vec::new();
    for item in store.iter()? {
        rows.push(item?);
    }
    if json {
        let out: Vec<DumpRow<'_, T>> = rows
            .iter()
            .map(|(pos, rec)| DumpRow {
                pos: *pos,
                key: rec.key(),
                record: rec,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    for (pos, rec) in &rows {
        println!("[{}] key={} {}", pos, rec.key(), serde_json::to_string(rec)?);
    }
    println!("{} record(s)", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::AccountKind;
    use crate::consts::STORE_HDR_SIZE;
    use crate::money::Cents;
    use std::fs::{self, OpenOptions};
    use std::io::{Seek, SeekFrom, Write};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_root(prefix: &str) -> PathBuf {
        let pid = std::process::id();
        let t = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("flatrec-cli-{prefix}-{pid}-{t}"))
    }

    fn seeded(root: &Path) -> Result<RecordStore<Account>> {
        let s = RecordStore::<Account>::new(root.join("accounts.dat")).with_fsync(false);
        for n in 1..=3 {
            s.append(&Account {
                number: n,
                name: "abc".to_string(),
                kind: AccountKind::Current,
                balance: Cents::from_cents(i64::from(n) * 100),
            })?;
        }
        Ok(s)
    }

    #[test]
    fn verify_clean_store_succeeds() -> Result<()> {
        let root = unique_root("clean");
        let s = seeded(&root)?;
        verify(s.path(), false)?;
        verify(s.path(), true)?;
        fs::remove_dir_all(&root).ok();
        Ok(())
    }

    #[test]
    fn verify_fails_on_bad_checksum() -> Result<()> {
        let root = unique_root("crc");
        let s = seeded(&root)?;
        {
            let mut f = OpenOptions::new().write(true).open(s.path())?;
            f.seek(SeekFrom::Start(STORE_HDR_SIZE as u64 + 6))?;
            f.write_all(&[0x5A])?;
        }
        let err = verify(s.path(), false).unwrap_err();
        assert!(format!("{err:#}").contains("1 bad slot(s)"), "{err:#}");
        fs::remove_dir_all(&root).ok();
        Ok(())
    }

    #[test]
    fn verify_fails_on_torn_tail() -> Result<()> {
        let root = unique_root("torn");
        let s = seeded(&root)?;
        {
            let mut f = OpenOptions::new().append(true).open(s.path())?;
            f.write_all(&[0xAA; 5])?;
        }
        let err = verify(s.path(), true).unwrap_err();
        assert!(format!("{err:#}").contains("5 torn tail byte(s)"), "{err:#}");
        fs::remove_dir_all(&root).ok();
        Ok(())
    }
}
