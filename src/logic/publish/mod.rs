//! Publish Module - CSV results to the object store
//!
//! The timestamped object is written first; the latest pointer is only
//! rewritten once that write (and the optional read-back) succeeded.

pub mod csv;
pub mod publisher;

pub use csv::{to_csv_bytes, CSV_HEADER};
pub use publisher::{PublishReceipt, Publisher};
