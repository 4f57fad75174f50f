//! store: generic fixed-record flat-file store.
//!
//! Submodules:
//! - header.rs: 32-byte versioned header (magic, tag, slot size, last_id, CRC)
//! - core.rs: RecordStore<T>, Found<T>, Edit<R>, open helpers
//! - scan.rs: Records iterator, scan_all, find_by_key, next_id
//! - write.rs: append, update_in_place, update_by_key, rebuild_excluding, rewrite_all
//! - verify.rs: inspect / verify_file (type-agnostic diagnostics)

pub mod core;
pub mod header;
pub mod scan;
pub mod verify;
pub mod write;

pub use self::core::{Edit, Found, RecordStore};
pub use header::StoreHeader;
pub use scan::Records;
pub use verify::{inspect, verify_file, StoreStatus, VerifyReport};
