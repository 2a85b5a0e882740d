//! Append-only storage for event registrations.
//!
//! Records are stamped at creation with a regional (India Standard Time)
//! display timestamp and can be selected by calendar day through a textual
//! prefix match on that timestamp.

pub mod clock;
mod error;
pub mod filter;
pub mod store;
mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::StoreError;
pub use filter::RecordFilter;
pub use store::{FileRecordStore, MemoryRecordStore, RecordStore, Store};
pub use types::*;
