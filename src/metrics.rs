//! Lightweight global metrics for the record stores.
//!
//! Process-wide atomic counters, bumped by `store::*` and read via `snapshot()`.
//! The binaries log a snapshot at debug level on exit; `flatrec status --json`
//! includes it.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

// ----- Writes -----
static RECORDS_APPENDED: AtomicU64 = AtomicU64::new(0);
static BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static INPLACE_UPDATES: AtomicU64 = AtomicU64::new(0);
static FSYNC_CALLS: AtomicU64 = AtomicU64::new(0);

// ----- Reads -----
static SLOTS_SCANNED: AtomicU64 = AtomicU64::new(0);
static CRC_FAILURES: AtomicU64 = AtomicU64::new(0);

// ----- Rewrites -----
static FILE_REWRITES: AtomicU64 = AtomicU64::new(0);
static REBUILDS: AtomicU64 = AtomicU64::new(0);
static RECORDS_DROPPED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub records_appended: u64,
    pub bytes_written: u64,
    pub inplace_updates: u64,
    pub fsync_calls: u64,

    pub slots_scanned: u64,
    pub crc_failures: u64,

    pub file_rewrites: u64,
    pub rebuilds: u64,
    pub records_dropped: u64,
}

impl MetricsSnapshot {
    /// Average bytes per append (0 when nothing was appended).
    pub fn avg_append_bytes(&self) -> f64 {
        if self.records_appended == 0 {
            0.0
        } else {
            self.bytes_written as f64 / self.records_appended as f64
        }
    }
}

pub fn record_append(bytes: usize) {
    RECORDS_APPENDED.fetch_add(1, Ordering::Relaxed);
    BYTES_WRITTEN.fetch_add(bytes as u64, Ordering::Relaxed);
}

pub fn record_inplace_update() {
    INPLACE_UPDATES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_fsync() {
    FSYNC_CALLS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_slots_scanned(n: u64) {
    SLOTS_SCANNED.fetch_add(n, Ordering::Relaxed);
}

pub fn record_crc_failure() {
    CRC_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_rewrite(bytes: usize) {
    FILE_REWRITES.fetch_add(1, Ordering::Relaxed);
    BYTES_WRITTEN.fetch_add(bytes as u64, Ordering::Relaxed);
}

pub fn record_rebuild(dropped: u64) {
    REBUILDS.fetch_add(1, Ordering::Relaxed);
    RECORDS_DROPPED.fetch_add(dropped, Ordering::Relaxed);
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        records_appended: RECORDS_APPENDED.load(Ordering::Relaxed),
        bytes_written: BYTES_WRITTEN.load(Ordering::Relaxed),
        inplace_updates: INPLACE_UPDATES.load(Ordering::Relaxed),
        fsync_calls: FSYNC_CALLS.load(Ordering::Relaxed),

        slots_scanned: SLOTS_SCANNED.load(Ordering::Relaxed),
        crc_failures: CRC_FAILURES.load(Ordering::Relaxed),

        file_rewrites: FILE_REWRITES.load(Ordering::Relaxed),
        rebuilds: REBUILDS.load(Ordering::Relaxed),
        records_dropped: RECORDS_DROPPED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    RECORDS_APPENDED.store(0, Ordering::Relaxed);
    BYTES_WRITTEN.store(0, Ordering::Relaxed);
    INPLACE_UPDATES.store(0, Ordering::Relaxed);
    FSYNC_CALLS.store(0, Ordering::Relaxed);

    SLOTS_SCANNED.store(0, Ordering::Relaxed);
    CRC_FAILURES.store(0, Ordering::Relaxed);

    FILE_REWRITES.store(0, Ordering::Relaxed);
    REBUILDS.store(0, Ordering::Relaxed);
    RECORDS_DROPPED.store(0, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Counters are process-wide and other tests bump them concurrently.
    #[test]
    fn counters_accumulate() {
        let before = snapshot();
        record_append(100);
        record_rebuild(2);
        record_crc_failure();
        let after = snapshot();
        assert!(after.records_appended > before.records_appended);
        assert!(after.bytes_written >= before.bytes_written + 100);
        assert!(after.records_dropped >= before.records_dropped + 2);
        assert!(after.crc_failures > before.crc_failures);
        assert!(after.avg_append_bytes() > 0.0);
    }
}
