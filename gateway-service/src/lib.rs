//! Gateway service exposing a small REST API in front of a local Ollama server.
//!
//! The interesting endpoint is `POST /api/ollama/chat`, which forwards a
//! single-shot generation request to Ollama and translates its reply and
//! failures into a stable JSON contract. The remaining endpoints are health
//! and echo probes.

pub mod config;
pub mod error;
pub mod handlers;
pub mod ollama;
pub mod options;
pub mod server;

use std::net::SocketAddr;

use thiserror::Error;

pub use config::GatewayConfig;
pub use error::{ErrorResponse, GatewayError};

/// Error type for service startup and serving
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

/// Type alias for service results
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Verbosity of the service logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Normal,
    Quiet,
}

/// Configuration options for the gateway service.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Address to bind the server to
    pub bind_address: SocketAddr,

    /// Whether to install the tracing subscriber on startup
    pub init_tracing: bool,

    pub log_level: LogLevel,

    /// Settings shared with the request handlers
    pub gateway: GatewayConfig,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            init_tracing: true,
            log_level: LogLevel::Normal,
            gateway: GatewayConfig::default(),
        }
    }
}

/// Start the gateway service with the given options.
///
/// This is the main entry point for starting the service programmatically.
pub async fn start_service(options: ServiceOptions) -> Result<()> {
    server::run_server(options).await
}
