//! Immutable gateway configuration.
//!
//! Built once at startup from the command line and environment, then shared
//! read-only with every request handler.

use std::time::Duration;

/// Secret used when none is configured
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key-change-this";

/// Hostname a container uses to reach services bound on its host
pub const DEFAULT_HOST_ALIAS: &str = "host.docker.internal";

/// Upper bound on a single upstream generation call: 5 minutes
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(300);

/// Settings consumed by the request handlers.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Signing secret. Held for completeness, no handler reads it.
    pub secret_key: String,

    /// Whether debug logging was requested. Held for completeness, the log
    /// level itself comes from [`LogLevel`](crate::LogLevel).
    pub debug: bool,

    /// Time bound applied to each upstream call
    pub upstream_timeout: Duration,

    /// Replacement for loopback hosts in upstream URLs
    pub host_alias: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            debug: false,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            host_alias: DEFAULT_HOST_ALIAS.to_string(),
        }
    }
}

impl GatewayConfig {
    /// True when the secret was left at its development default.
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}
