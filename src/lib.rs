//! flatrec: fixed-record flat-file stores and the two console programs built
//! on them (bank ledger, restaurant menu/orders).

pub mod codec;
pub mod config;
pub mod consts;
pub mod metrics;
pub mod money;
pub mod store;
pub mod util;

pub mod bank;
pub mod restaurant;

pub mod cli;
pub mod console;

pub use codec::FixedRecord;
pub use config::FlatConfig;
pub use money::Cents;
pub use store::{Edit, Found, RecordStore};
