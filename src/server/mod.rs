//! # HTTP Server
//!
//! - [`dispatcher`]: Router, handlers, CORS and request logging
//! - [`server`]: Startup, serving and graceful shutdown
//! - [`metrics`]: Submission outcome counters

pub mod dispatcher;
pub mod metrics;
pub mod server;

pub use dispatcher::{create_router, ApiError, ApiResponse, AppState};
pub use metrics::{MetricsSnapshot, SubmissionMetrics};
pub use server::{shutdown_signal, FormServer};
