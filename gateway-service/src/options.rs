//! Command-line and environment options for the gateway service.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::config::{GatewayConfig, DEFAULT_HOST_ALIAS, DEFAULT_SECRET_KEY};
use crate::{LogLevel, Result, ServiceError, ServiceOptions};

/// Command-line arguments for the gateway service.
///
/// Each option falls back to an environment variable when the flag is not
/// given.
#[derive(Parser, Debug)]
#[command(author, version, about = "HTTP gateway in front of a local Ollama server")]
pub struct CliOptions {
    /// Interface to bind the server to
    #[arg(long, env = "GATEWAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Enable debug logging
    #[arg(short, long, env = "GATEWAY_DEBUG")]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Signing secret
    #[arg(long, env = "SECRET_KEY", default_value = DEFAULT_SECRET_KEY, hide_env_values = true)]
    pub secret_key: String,

    /// Seconds to wait for Ollama before giving up on a request
    #[arg(long, env = "OLLAMA_TIMEOUT_SECS", default_value_t = 300)]
    pub upstream_timeout_secs: u64,

    /// Hostname that replaces localhost in upstream URLs
    #[arg(long, env = "OLLAMA_HOST_ALIAS", default_value = DEFAULT_HOST_ALIAS)]
    pub host_alias: String,
}

impl CliOptions {
    /// Convert CLI options to ServiceOptions
    pub fn into_service_options(self) -> Result<ServiceOptions> {
        let ip = self
            .host
            .parse::<IpAddr>()
            .map_err(|e| ServiceError::ConfigError(format!("Invalid host '{}': {}", self.host, e)))?;

        if self.upstream_timeout_secs == 0 {
            return Err(ServiceError::ConfigError(
                "Upstream timeout must be at least one second".to_string(),
            ));
        }

        let host_alias = self.host_alias.trim().to_string();
        if host_alias.is_empty() {
            return Err(ServiceError::ConfigError("Host alias must not be empty".to_string()));
        }

        let log_level = if self.debug {
            LogLevel::Debug
        } else if self.quiet {
            LogLevel::Quiet
        } else {
            LogLevel::Normal
        };

        Ok(ServiceOptions {
            bind_address: SocketAddr::new(ip, self.port),
            init_tracing: true,
            log_level,
            gateway: GatewayConfig {
                secret_key: self.secret_key,
                debug: self.debug,
                upstream_timeout: Duration::from_secs(self.upstream_timeout_secs),
                host_alias,
            },
        })
    }
}
