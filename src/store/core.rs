//! store/core: RecordStore<T>: path + options, file opening, position types.
//!
//! A store holds no open handle between calls. Every operation opens the
//! file, does its work and drops the handle before returning (on success and
//! on error alike).

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::codec::FixedRecord;
use crate::consts::STORE_HDR_SIZE;
use crate::metrics;

use super::header::{slot_count, StoreHeader};

/// Flat file of fixed-size records of type T.
pub struct RecordStore<T: FixedRecord> {
    pub(crate) path: PathBuf,
    pub(crate) fsync: bool,
    _marker: PhantomData<fn() -> T>,
}

// Derive would require T: Clone/Debug.
impl<T: FixedRecord> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            fsync: self.fsync,
            _marker: PhantomData,
        }
    }
}

impl<T: FixedRecord> std::fmt::Debug for RecordStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("path", &self.path)
            .field("tag", &String::from_utf8_lossy(T::TAG))
            .field("fsync", &self.fsync)
            .finish()
    }
}

/// A record together with its slot index in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Found<T> {
    pub pos: u64,
    pub record: T,
}

/// Decision returned by an `update_by_key` closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<R> {
    /// Write the (mutated) record back into its slot.
    Commit(R),
    /// Leave the file untouched.
    Discard(R),
}

/// Open handle plus validated header and record count.
pub(crate) struct Opened {
    pub file: File,
    pub header: StoreHeader,
    pub count: u64,
}

impl<T: FixedRecord> RecordStore<T> {
    /// No I/O happens here; the file is created by the first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            fsync: true,
            _marker: PhantomData,
        }
    }

    pub fn with_fsync(mut self, on: bool) -> Self {
        self.fsync = on;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Number of records (from the file length; absent file → 0).
    pub fn count(&self) -> Result<u64> {
        Ok(self.open_existing(false)?.map(|o| o.count).unwrap_or(0))
    }

    /// Byte offset of slot `pos`.
    #[inline]
    pub(crate) fn slot_offset(&self, header: &StoreHeader, pos: u64) -> u64 {
        STORE_HDR_SIZE as u64 + pos * u64::from(header.slot_size)
    }

    /// Open an existing store and validate it for T.
    /// Ok(None) if the file does not exist or is still empty (no header yet).
    pub(crate) fn open_existing(&self, write: bool) -> Result<Option<Opened>> {
        let mut file = match OpenOptions::new().read(true).write(write).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("open store {}", self.path.display()))
            }
        };
        let len = file
            .metadata()
            .with_context(|| format!("stat store {}", self.path.display()))?
            .len();
        if len == 0 {
            return Ok(None);
        }
        let header = StoreHeader::read_from(&mut file, &self.path)?;
        header.expect::<T>(&self.path)?;
        let count = slot_count(len, header.slot_size, &self.path)?;
        Ok(Some(Opened {
            file,
            header,
            count,
        }))
    }

    /// Open for writing, creating the file (and its header) if needed.
    pub(crate) fn open_or_create(&self) -> Result<Opened> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create data dir {}", parent.display()))?;
            }
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .with_context(|| format!("open store for write {}", self.path.display()))?;
        let len = file.metadata()?.len();
        if len == 0 {
            let header = StoreHeader::for_record::<T>();
            header.write_to(&mut file)?;
            log::debug!(
                "created store {} (tag={}, slot_size={})",
                self.path.display(),
                header.tag_str(),
                header.slot_size
            );
            return Ok(Opened {
                file,
                header,
                count: 0,
            });
        }
        let header = StoreHeader::read_from(&mut file, &self.path)?;
        header.expect::<T>(&self.path)?;
        let count = slot_count(len, header.slot_size, &self.path)?;
        Ok(Opened {
            file,
            header,
            count,
        })
    }

    /// fsync a data file if the store is configured to.
    pub(crate) fn sync(&self, f: &File) -> Result<()> {
        if self.fsync {
            f.sync_all()
                .with_context(|| format!("fsync {}", self.path.display()))?;
            metrics::record_fsync();
        }
        Ok(())
    }
}
