//! Upstream address handling.
//!
//! Inside a container `localhost` resolves to the container itself, not to
//! the machine running Ollama. Loopback hosts are swapped for the
//! container-to-host alias before the upstream endpoint is built.

use url::Url;

use crate::error::{GatewayError, GatewayResult};

/// Loopback spellings replaced by the host alias
const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Common misspelling of `host.docker.internal`
const NEAR_ALIAS: &str = "docker.host.internal";

/// Path of Ollama's single-shot generation route
const GENERATE_PATH: &str = "/api/generate";

/// Rewrite an upstream base URL so it is reachable from inside a container.
///
/// Every `localhost` or `127.0.0.1` is replaced with `alias` in one pass, so
/// an alias that itself contains a loopback spelling is never rewritten
/// again. Without a loopback host, the near-alias spelling is normalized
/// instead. Anything else is returned unchanged.
pub fn rewrite_host(url: &str, alias: &str) -> String {
    if LOOPBACK_HOSTS.iter().any(|host| url.contains(host)) {
        replace_loopback(url, alias)
    } else if url.contains(NEAR_ALIAS) {
        url.replace(NEAR_ALIAS, alias)
    } else {
        url.to_string()
    }
}

fn replace_loopback(url: &str, alias: &str) -> String {
    let mut rewritten = String::with_capacity(url.len() + alias.len());
    let mut rest = url;

    loop {
        let next = LOOPBACK_HOSTS
            .iter()
            .filter_map(|host| rest.find(host).map(|at| (at, host.len())))
            .min_by_key(|(at, _)| *at);

        match next {
            Some((at, len)) => {
                rewritten.push_str(&rest[..at]);
                rewritten.push_str(alias);
                rest = &rest[at + len..];
            }
            None => {
                rewritten.push_str(rest);
                return rewritten;
            }
        }
    }
}

/// Build the generation endpoint for a base URL.
pub fn generate_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), GENERATE_PATH)
}

/// Check that a base URL is an absolute http(s) URL with a host.
pub fn validate_base_url(base_url: &str) -> GatewayResult<()> {
    let invalid = |reason: String| {
        GatewayError::BadRequest(format!("Invalid Ollama URL '{}': {}", base_url, reason))
    };

    let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALIAS: &str = "host.docker.internal";

    #[test]
    fn test_rewrites_loopback_hosts() {
        assert_eq!(
            rewrite_host("http://localhost:11434", ALIAS),
            "http://host.docker.internal:11434"
        );
        assert_eq!(
            rewrite_host("http://127.0.0.1:11434/", ALIAS),
            "http://host.docker.internal:11434/"
        );
    }

    #[test]
    fn test_rewrites_every_occurrence() {
        let rewritten = rewrite_host("http://localhost:11434/proxy/127.0.0.1/localhost", ALIAS);
        assert_eq!(
            rewritten,
            "http://host.docker.internal:11434/proxy/host.docker.internal/host.docker.internal"
        );
        assert!(!rewritten.contains("localhost"));
        assert!(!rewritten.contains("127.0.0.1"));
    }

    #[test]
    fn test_normalizes_near_alias() {
        assert_eq!(
            rewrite_host("http://docker.host.internal:11434", ALIAS),
            "http://host.docker.internal:11434"
        );
    }

    #[test]
    fn test_canonical_alias_unchanged() {
        let url = "http://host.docker.internal:11434";
        assert_eq!(rewrite_host(url, ALIAS), url);
        assert_eq!(rewrite_host(&rewrite_host(url, ALIAS), ALIAS), url);
    }

    #[test]
    fn test_other_hosts_unchanged() {
        assert_eq!(
            rewrite_host("https://ollama.internal.example:443", ALIAS),
            "https://ollama.internal.example:443"
        );
    }

    #[test]
    fn test_alias_containing_loopback_not_rewritten_twice() {
        assert_eq!(
            rewrite_host("http://localhost:11434", "127.0.0.1"),
            "http://127.0.0.1:11434"
        );
        assert_eq!(
            rewrite_host("http://127.0.0.1:11434", "localhost.localdomain"),
            "http://localhost.localdomain:11434"
        );
    }

    #[test]
    fn test_generate_endpoint() {
        assert_eq!(
            generate_endpoint("http://host.docker.internal:11434"),
            "http://host.docker.internal:11434/api/generate"
        );
        assert_eq!(
            generate_endpoint("http://host.docker.internal:11434//"),
            "http://host.docker.internal:11434/api/generate"
        );
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("http://host.docker.internal:11434").is_ok());
        assert!(validate_base_url("https://ollama.example/").is_ok());

        for url in ["not a url", "ftp://host.docker.internal", "host.docker.internal:11434"] {
            let err = validate_base_url(url).unwrap_err();
            assert!(
                matches!(err, GatewayError::BadRequest(ref msg) if msg.starts_with("Invalid Ollama URL")),
                "{}",
                url
            );
        }
    }
}
