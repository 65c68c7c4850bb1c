//! # Form Server Binary Entry Point
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin form-server
//! cargo run --bin form-server -- --port 9000 --data-file submissions.csv
//! cargo run --bin form-server -- --config config/form-server.toml
//! ```
//!
//! Command-line flags (or their environment variables) override values from
//! the configuration file, which in turn override the built-in defaults.

use clap::Parser;
use std::path::PathBuf;

use watss_forms::common::config::ServerConfig;
use watss_forms::common::logging::init_logger;
use watss_forms::FormServer;

/// Command-line arguments for the form server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (TOML format)
    #[arg(short, long, env = "FORM_SERVER_CONFIG")]
    config: Option<String>,

    /// Interface to bind
    #[arg(long, env = "FORM_SERVER_BIND")]
    bind: Option<String>,

    /// TCP port to listen on
    #[arg(short, long, env = "FORM_SERVER_PORT")]
    port: Option<u16>,

    /// CSV file receiving submissions
    #[arg(short, long, env = "FORM_SERVER_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Directory served for GET/HEAD requests
    #[arg(short, long, env = "FORM_SERVER_STATIC_DIR")]
    static_dir: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_file) = self.data_file {
            config.storage.data_file = data_file;
        }
        if let Some(static_dir) = self.static_dir {
            config.assets.static_dir = static_dir;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let config = Args::parse().into_config()?;

    FormServer::new(config).run().await
}
