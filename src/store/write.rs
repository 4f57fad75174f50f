//! store/write: append, in-place updates and whole-file replacement.
//!
//! - append: one slot at the end, header.last_id raised to the record key.
//! - update_in_place / update_by_key: overwrite one slot, file length unchanged.
//! - rebuild_excluding / rewrite_all: write `<file>.tmp`, fsync, rename over the
//!   store file, fsync the parent dir. There is no window in which the store file
//!   is missing.

use anyhow::{anyhow, Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};

use crate::codec::{decode_slot, encode_slot, slot_size, FixedRecord};
use crate::consts::STORE_HDR_SIZE;
use crate::metrics;
use crate::util::{fsync_parent_dir, tmp_path_for};

use super::core::{Edit, Opened, RecordStore};
use super::header::StoreHeader;

impl<T: FixedRecord> RecordStore<T> {
    /// Append one record at the end of the file (creating the file if needed).
    pub fn append(&self, rec: &T) -> Result<()> {
        let slot = encode_slot(rec)?;
        let Opened {
            mut file,
            mut header,
            count,
        } = self.open_or_create()?;

        let off = self.slot_offset(&header, count);
        file.seek(SeekFrom::Start(off))?;
        file.write_all(&slot)
            .with_context(|| format!("append record to {}", self.path.display()))?;

        let key = rec.key();
        if key > header.last_id {
            header.last_id = key;
            header.write_to(&mut file)?;
        }
        self.sync(&file)?;
        metrics::record_append(slot.len());
        log::debug!(
            "append {}: key={} at slot {}",
            self.path.display(),
            key,
            count
        );
        Ok(())
    }

    /// Overwrite slot `pos` with `rec`.
    ///
    /// The slot must exist and currently hold a record with the same key as
    /// `rec`; a position that went stale (file rebuilt in between) is refused.
    pub fn update_in_place(&self, pos: u64, rec: &T) -> Result<()> {
        let Some(Opened {
            mut file,
            header,
            count,
        }) = self.open_existing(true)?
        else {
            return Err(anyhow!(
                "update_in_place: store {} does not exist",
                self.path.display()
            ));
        };
        if pos >= count {
            return Err(anyhow!(
                "update_in_place: slot {} out of range 0..{} in {}",
                pos,
                count,
                self.path.display()
            ));
        }

        let off = self.slot_offset(&header, pos);
        let mut cur = vec![0u8; slot_size::<T>()];
        file.seek(SeekFrom::Start(off))?;
        file.read_exact(&mut cur)?;
        let existing: T = decode_slot(&cur)
            .with_context(|| {
                format!("record {} at offset {} in {}", pos, off, self.path.display())
            })?;
        if existing.key() != rec.key() {
            return Err(anyhow!(
                "update_in_place: slot {} in {} holds key {}, not {}",
                pos,
                self.path.display(),
                existing.key(),
                rec.key()
            ));
        }

        let slot = encode_slot(rec)?;
        file.seek(SeekFrom::Start(off))?;
        file.write_all(&slot)?;
        self.sync(&file)?;
        metrics::record_inplace_update();
        Ok(())
    }

    /// Find the first record with `key`, let `f` edit it, and on
    /// `Edit::Commit` write it back into the same slot.
    ///
    /// Single open, single pass: the slot is rewritten by stepping back one
    /// slot from the read cursor right after the matching read.
    /// Returns None if no record matches.
    pub fn update_by_key<R, F>(&self, key: u64, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut T) -> Result<Edit<R>>,
    {
        let Some(Opened {
            mut file,
            mut header,
            count,
        }) = self.open_existing(true)?
        else {
            return Ok(None);
        };

        let slot_len = slot_size::<T>();
        let mut buf = vec![0u8; slot_len];
        file.seek(SeekFrom::Start(STORE_HDR_SIZE as u64))?;
        for pos in 0..count {
            file.read_exact(&mut buf)
                .with_context(|| format!("read record {} in {}", pos, self.path.display()))?;
            metrics::record_slots_scanned(1);
            let mut rec: T = decode_slot(&buf).with_context(|| {
                format!(
                    "record {} at offset {} in {}",
                    pos,
                    self.slot_offset(&header, pos),
                    self.path.display()
                )
            })?;
            if rec.key() != key {
                continue;
            }

            return match f(&mut rec)? {
                Edit::Discard(r) => Ok(Some(r)),
                Edit::Commit(r) => {
                    let slot = encode_slot(&rec)?;
                    file.seek(SeekFrom::Current(-(slot_len as i64)))?;
                    file.write_all(&slot)?;
                    if rec.key() > header.last_id {
                        header.last_id = rec.key();
                        header.write_to(&mut file)?;
                    }
                    self.sync(&file)?;
                    metrics::record_inplace_update();
                    log::debug!(
                        "update {}: key={} rewritten at slot {}",
                        self.path.display(),
                        key,
                        pos
                    );
                    Ok(Some(r))
                }
            };
        }
        Ok(None)
    }

    /// Delete by key: copy every record whose key differs into a new file and
    /// swap it in. Order and bytes of the kept records are preserved.
    /// Returns the number of records removed.
    pub fn rebuild_excluding(&self, key: u64) -> Result<usize> {
        let Some(Opened {
            mut file,
            header,
            count,
        }) = self.open_existing(false)?
        else {
            return Ok(0);
        };

        file.seek(SeekFrom::Start(STORE_HDR_SIZE as u64))?;
        let mut reader = BufReader::new(file);
        let slot_len = slot_size::<T>();
        let path = self.path.clone();
        let mut removed = 0usize;

        self.replace_with(&header, |w| {
            let mut buf = vec![0u8; slot_len];
            for pos in 0..count {
                reader
                    .read_exact(&mut buf)
                    .with_context(|| format!("read record {} in {}", pos, path.display()))?;
                metrics::record_slots_scanned(1);
                let rec: T = decode_slot(&buf)
                    .with_context(|| format!("record {} in {}", pos, path.display()))?;
                if rec.key() == key {
                    removed += 1;
                    continue;
                }
                // copy verified bytes as they are
                w.write_all(&buf)?;
            }
            Ok(())
        })?;

        metrics::record_rebuild(removed as u64);
        log::info!(
            "rebuild {}: removed {} record(s) with key {}, kept {}",
            self.path.display(),
            removed,
            key,
            count as usize - removed
        );
        Ok(removed)
    }

    /// Replace the whole file with `records` (in the given order).
    pub fn rewrite_all(&self, records: &[T]) -> Result<()> {
        let mut header = match self.open_existing(false)? {
            Some(o) => o.header,
            None => StoreHeader::for_record::<T>(),
        };
        if let Some(max) = records.iter().map(T::key).max() {
            header.last_id = header.last_id.max(max);
        }

        let mut bytes = 0usize;
        self.replace_with(&header, |w| {
            for rec in records {
                let slot = encode_slot(rec)?;
                w.write_all(&slot)?;
                bytes += slot.len();
            }
            Ok(())
        })?;

        metrics::record_rewrite(bytes);
        log::info!(
            "rewrite {}: {} record(s)",
            self.path.display(),
            records.len()
        );
        Ok(())
    }

    /// Write header + `fill` into `<file>.tmp`, then atomically rename it over
    /// the store. The tmp file is removed if anything fails before the rename.
    fn replace_with<F>(&self, header: &StoreHeader, fill: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<()>,
    {
        let tmp = tmp_path_for(&self.path);
        let _ = fs::remove_file(&tmp);

        let res = (|| -> Result<()> {
            let f = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp)
                .with_context(|| format!("open tmp {}", tmp.display()))?;
            let mut w = BufWriter::new(f);
            w.write_all(&header.encode())?;
            fill(&mut w)?;
            let f = w
                .into_inner()
                .map_err(|e| anyhow!("flush tmp {}: {}", tmp.display(), e.error()))?;
            self.sync(&f)?;
            Ok(())
        })();
        if let Err(e) = res {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        fs::rename(&tmp, &self.path)
            .with_context(|| format!("rename {} -> {}", tmp.display(), self.path.display()))?;
        if self.fsync {
            let _ = fsync_parent_dir(&self.path);
        }
        Ok(())
    }
}
