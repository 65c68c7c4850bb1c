//! # Record Store
//!
//! Durable, append-only CSV storage for form submissions.
//!
//! - [`csv`]: Row encoding (and decoding, for verification)
//! - [`record`]: The immutable [`SubmissionRecord`]
//! - [`store`]: The lock-guarded [`RecordStore`]

pub mod csv;
pub mod record;
pub mod store;

pub use record::{SubmissionRecord, HEADER};
pub use store::{RecordStore, StoreError};
