//! Web server for Warden.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use super::handlers::AppState;
use super::router::create_app;
use crate::config::ServerConfig;
use crate::{Result, WardenError};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Per-request deadline (read plus write).
    request_timeout: Duration,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &ServerConfig, app_state: Arc<AppState>) -> Result<Self> {
        let bind_address = config.bind_address();
        let addr = bind_address.parse::<SocketAddr>().map_err(|e| {
            WardenError::Config(format!("invalid server address {bind_address}: {e}"))
        })?;

        let request_timeout = Duration::from_secs(
            config
                .read_timeout_secs
                .saturating_add(config.write_timeout_secs),
        );

        Ok(Self {
            addr,
            app_state,
            request_timeout,
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Run the web server until ctrl-c.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = create_app(self.app_state, self.request_timeout);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = create_app(self.app_state, self.request_timeout);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => tracing::warn!(error = %e, "Failed to listen for ctrl-c"),
    }
}
