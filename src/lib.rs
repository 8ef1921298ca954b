//! floorviz - AI floor visualizer
//!
//! A proxy that sends a room photo and floor samples to a hosted image model
//! and relays the generated image, plus the client-side upload controller.

pub mod api;
pub mod config;
pub mod data_url;
pub mod generate;
pub mod openrouter;
pub mod sse;
pub mod studio;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

pub use config::Config;
use openrouter::OpenRouterClient;

/// The floorviz server instance
pub struct Server {
    config: Config,
    provider: Arc<OpenRouterClient>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Result<Self> {
        let provider = OpenRouterClient::new(config.provider.clone())?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            provider: Arc::new(provider),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Get the provider client
    pub fn provider(&self) -> Arc<OpenRouterClient> {
        self.provider.clone()
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(&self.config, self.provider.clone())
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("floorviz listening on {}", local_addr);

        if !self.provider.is_configured() {
            warn!("OPENROUTER_API_KEY is not set; generate requests will fail");
        } else {
            info!("Using model {}", self.provider.model());
        }

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("floorviz shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
