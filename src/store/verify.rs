//! store/verify: type-agnostic inspection of a store file.
//!
//! - `inspect(path)`: header fields and slot count, without decoding payloads.
//! - `verify_file(path)`: lenient pass over every slot checking its CRC trailer.
//!   Unlike the scan path it does not stop at the first bad slot; it reports
//!   every failing index and the size of a torn tail.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::codec::{slot_crc_ok, FixedRecord};
use crate::consts::STORE_HDR_SIZE;
use crate::metrics;

use super::core::RecordStore;
use super::header::StoreHeader;

#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub path: String,
    pub tag: String,
    pub version: u32,
    pub slot_size: u32,
    pub last_id: u64,
    pub records: u64,
    pub file_bytes: u64,
    pub torn_tail_bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub path: String,
    pub tag: String,
    pub records: u64,
    pub ok: u64,
    /// Slot indexes whose CRC trailer does not match.
    pub crc_failures: Vec<u64>,
    pub torn_tail_bytes: u64,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.crc_failures.is_empty() && self.torn_tail_bytes == 0
    }
}

fn read_header_lenient(path: &Path) -> Result<(std::fs::File, StoreHeader, u64)> {
    let mut f = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("open store {}", path.display()))?;
    let len = f.metadata()?.len();
    let header = StoreHeader::read_from(&mut f, path)?;
    Ok((f, header, len))
}

/// Header summary and slot count of a store file of any record type.
pub fn inspect(path: &Path) -> Result<StoreStatus> {
    let (_f, header, len) = read_header_lenient(path)?;
    let payload = len.saturating_sub(STORE_HDR_SIZE as u64);
    let slot = u64::from(header.slot_size);
    Ok(StoreStatus {
        path: path.display().to_string(),
        tag: header.tag_str(),
        version: header.version,
        slot_size: header.slot_size,
        last_id: header.last_id,
        records: payload / slot,
        file_bytes: len,
        torn_tail_bytes: payload % slot,
    })
}

/// Check the CRC of every whole slot; never stops early.
pub fn verify_file(path: &Path) -> Result<VerifyReport> {
    let (mut f, header, len) = read_header_lenient(path)?;
    let payload = len.saturating_sub(STORE_HDR_SIZE as u64);
    let slot = u64::from(header.slot_size);
    let records = payload / slot;

    f.seek(SeekFrom::Start(STORE_HDR_SIZE as u64))?;
    let mut reader = BufReader::new(f);
    let mut buf = vec![0u8; header.slot_size as usize];
    let mut ok = 0u64;
    let mut crc_failures = Vec::new();
    for pos in 0..records {
        reader
            .read_exact(&mut buf)
            .with_context(|| format!("read slot {} in {}", pos, path.display()))?;
        metrics::record_slots_scanned(1);
        if slot_crc_ok(&buf) {
            ok += 1;
        } else {
            metrics::record_crc_failure();
            crc_failures.push(pos);
        }
    }

    let report = VerifyReport {
        path: path.display().to_string(),
        tag: header.tag_str(),
        records,
        ok,
        crc_failures,
        torn_tail_bytes: payload % slot,
    };
    if !report.is_clean() {
        log::warn!(
            "verify {}: {} bad slot(s), {} torn tail byte(s)",
            path.display(),
            report.crc_failures.len(),
            report.torn_tail_bytes
        );
    }
    Ok(report)
}

impl<T: FixedRecord> RecordStore<T> {
    /// `inspect` plus a check that the file holds T. None if absent.
    pub fn status(&self) -> Result<Option<StoreStatus>> {
        if !self.exists() {
            return Ok(None);
        }
        let st = inspect(&self.path)?;
        if st.tag.as_bytes() != T::TAG {
            return Err(anyhow::anyhow!(
                "{} holds '{}' records, expected '{}'",
                self.path.display(),
                st.tag,
                String::from_utf8_lossy(T::TAG)
            ));
        }
        Ok(Some(st))
    }

    /// Lenient CRC check of this store. None if absent.
    pub fn verify(&self) -> Result<Option<VerifyReport>> {
        if !self.exists() {
            return Ok(None);
        }
        verify_file(&self.path).map(Some)
    }
}
