//! HTTP server for link tables

pub mod router;
pub mod handlers;

use std::sync::Arc;

use anyhow::Context;
use reftable_core::{LinkGraph, TableGenSettings};
use tokio::net::TcpListener;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7891;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Shared state: the scanned vault and the settings used when a request
/// does not override them.
#[derive(Debug)]
pub struct ServerState {
    pub graph: Arc<LinkGraph>,
    pub defaults: TableGenSettings,
}

impl ServerState {
    pub fn new(graph: LinkGraph, defaults: TableGenSettings) -> Self {
        ServerState {
            graph: Arc::new(graph),
            defaults,
        }
    }
}

pub struct ReftableServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl ReftableServer {
    pub fn new(graph: LinkGraph, defaults: TableGenSettings, config: ServerConfig) -> Self {
        ReftableServer {
            state: Arc::new(ServerState::new(graph, defaults)),
            config,
        }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Bind and serve until the process exits.
    pub async fn start(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!("Listening on http://{}", listener.local_addr()?);

        let app = router::create_router(self.state);
        axum::serve(listener, app).await?;
        Ok(())
    }
}
