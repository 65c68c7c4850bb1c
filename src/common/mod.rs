//! # Common Components
//!
//! Shared utilities used by the server and the binary entry point.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration with defaults
//! - [`logging`]: `env_logger` setup with the `[HH:MM:SS] [LEVEL]` line format
//! - [`network`]: Local IP discovery for the startup banner

pub mod config;
pub mod logging;
pub mod network;
