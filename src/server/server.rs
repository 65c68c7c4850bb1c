//! # Form Server - Process Lifecycle
//!
//! Owns startup and shutdown around the [dispatcher](super::dispatcher):
//!
//! 1. Initialize the record store (header row) before any connection is accepted
//! 2. Bind the listener and log the access banner
//! 3. Serve connections concurrently until a shutdown signal arrives
//! 4. Stop accepting, let in-flight requests finish, log a summary

use anyhow::{Context, Result};
use log::{error, info};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::common::config::ServerConfig;
use crate::common::network::local_ip;
use crate::server::dispatcher::{create_router, AppState};
use crate::store::RecordStore;

const BANNER_WIDTH: usize = 50;

/// HTTP front end for the submission store.
pub struct FormServer {
    config: ServerConfig,
    state: AppState,
}

impl FormServer {
    /// Create a server from configuration. Nothing is bound or written yet.
    ///
    /// # Example
    /// ```ignore
    /// let server = FormServer::new(ServerConfig::default());
    /// server.run().await?;
    /// ```
    pub fn new(config: ServerConfig) -> Self {
        let store = RecordStore::new(&config.storage.data_file)
            .with_sync_writes(config.storage.sync_writes);
        let state = AppState::new(Arc::new(store), &config.assets.static_dir);

        Self { config, state }
    }

    /// Bind the configured address and serve until Ctrl+C / SIGTERM.
    pub async fn run(self) -> Result<()> {
        let addr = self.config.listen_address();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    ///
    /// The store is initialized before the first connection is accepted.
    /// After `shutdown` resolves, no new connections are accepted and the
    /// call returns once in-flight requests have completed.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.state
            .store
            .ensure_initialized()
            .context("failed to initialize record store")?;

        let local_addr = listener.local_addr()?;
        self.log_banner(local_addr);

        let app = create_router(self.state.clone());
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        let summary = self.state.metrics.snapshot();
        info!(
            "🛑 Server stopped. Submissions received: {}, saved: {}, rejected: {}, failed: {}",
            summary.received, summary.saved, summary.rejected, summary.failed
        );
        Ok(())
    }

    fn log_banner(&self, local_addr: SocketAddr) {
        let data_file = self.state.store.path();
        let data_file =
            std::fs::canonicalize(data_file).unwrap_or_else(|_| data_file.to_path_buf());
        let port = local_addr.port();

        info!("{}", "=".repeat(BANNER_WIDTH));
        info!("WATSS Form Server");
        info!("{}", "=".repeat(BANNER_WIDTH));
        info!("Local access:   http://localhost:{}", port);
        if local_addr.ip().is_unspecified() {
            info!("Network access: http://{}:{}", local_ip(), port);
        } else {
            info!("Bound to:       http://{}", local_addr);
        }
        info!("CSV file:       {}", data_file.display());
        info!("Static files:   {}", self.state.static_dir.display());
        info!("{}", "=".repeat(BANNER_WIDTH));
        info!("Press Ctrl+C to stop the server");
    }
}

/// Resolve on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received terminate signal, shutting down..."),
    }
}
