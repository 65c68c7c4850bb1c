//! # WATSS Forms
//!
//! HTTP form intake that appends every submission to a shared CSV file while
//! serving the site's static assets.
//!
//! ```text
//! request -> dispatcher -> submission validator -> record store (CSV)
//! ```

pub mod common;
pub mod server;
pub mod store;
pub mod submission;

pub use server::FormServer;
pub use store::{RecordStore, SubmissionRecord};
