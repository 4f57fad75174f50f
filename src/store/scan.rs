//! store/scan: read side: streaming iterator, scan_all, find_by_key, next_id.
//!
//! Short reads are fatal: a torn trailing slot is reported when the file is
//! opened (see `header::slot_count`) and a CRC mismatch stops the scan with an
//! error naming the slot and its offset.

use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::codec::{decode_slot, FixedRecord};
use crate::consts::STORE_HDR_SIZE;
use crate::metrics;

use super::core::{Found, RecordStore};
use super::header::StoreHeader;

/// Streaming iterator over `(slot index, record)` in file order.
/// Yields nothing for an absent store; stops after the first error.
pub struct Records<T: FixedRecord> {
    reader: Option<BufReader<File>>,
    header: Option<StoreHeader>,
    path: PathBuf,
    next_pos: u64,
    count: u64,
    buf: Vec<u8>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FixedRecord> Records<T> {
    /// Header of the underlying file (None for an absent store).
    pub fn header(&self) -> Option<&StoreHeader> {
        self.header.as_ref()
    }
}

impl<T: FixedRecord> Iterator for Records<T> {
    type Item = Result<(u64, T)>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        if self.next_pos >= self.count {
            self.reader = None;
            return None;
        }
        let pos = self.next_pos;
        let off = STORE_HDR_SIZE as u64 + pos * self.buf.len() as u64;
        if let Err(e) = reader.read_exact(&mut self.buf) {
            self.reader = None;
            return Some(Err(anyhow!(
                "short read of record {} at offset {} in {}: {}",
                pos,
                off,
                self.path.display(),
                e
            )));
        }
        metrics::record_slots_scanned(1);
        self.next_pos += 1;
        match decode_slot::<T>(&self.buf) {
            Ok(rec) => Some(Ok((pos, rec))),
            Err(e) => {
                metrics::record_crc_failure();
                self.reader = None;
                Some(Err(e.context(format!(
                    "record {} at offset {} in {}",
                    pos,
                    off,
                    self.path.display()
                ))))
            }
        }
    }
}

impl<T: FixedRecord> RecordStore<T> {
    /// Fresh iterator from the first record. Each call reopens the file, so
    /// the sequence can be restarted at will.
    pub fn iter(&self) -> Result<Records<T>> {
        let slot = crate::codec::slot_size::<T>();
        let opened = self.open_existing(false)?;
        let (reader, header, count) = match opened {
            None => (None, None, 0),
            Some(mut o) => {
                o.file
                    .seek(SeekFrom::Start(STORE_HDR_SIZE as u64))
                    .with_context(|| format!("seek {}", self.path.display()))?;
                (Some(BufReader::new(o.file)), Some(o.header), o.count)
            }
        };
        Ok(Records {
            reader,
            header,
            path: self.path.clone(),
            next_pos: 0,
            count,
            buf: vec![0u8; slot],
            _marker: PhantomData,
        })
    }

    /// Visit every record in file order.
    pub fn for_each<F: FnMut(u64, &T)>(&self, mut f: F) -> Result<()> {
        for item in self.iter()? {
            let (pos, rec) = item?;
            f(pos, &rec);
        }
        Ok(())
    }

    /// All records in file order (absent store → empty).
    pub fn scan_all(&self) -> Result<Vec<T>> {
        let mut out = Vec::new();
        for item in self.iter()? {
            out.push(item?.1);
        }
        log::debug!("scan_all {}: {} record(s)", self.path.display(), out.len());
        Ok(out)
    }

    /// First record whose key equals `key`. Later duplicates are not reachable.
    pub fn find_by_key(&self, key: u64) -> Result<Option<Found<T>>> {
        for item in self.iter()? {
            let (pos, record) = item?;
            if record.key() == key {
                return Ok(Some(Found { pos, record }));
            }
        }
        Ok(None)
    }

    /// Next key to hand out: 1 + max(persisted high-water mark, largest key present).
    pub fn next_id(&self) -> Result<u64> {
        let mut iter = self.iter()?;
        let mut max = iter.header().map(|h| h.last_id).unwrap_or(0);
        for item in &mut iter {
            max = max.max(item?.1.key());
        }
        max.checked_add(1)
            .ok_or_else(|| anyhow!("key space exhausted in {}", self.path.display()))
    }
}
