//! Client for Ollama's single-shot generation endpoint.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::host::generate_endpoint;
use super::types::{GenerateRequest, GenerateResponse};
use crate::error::{GatewayError, GatewayResult};

/// HTTP client for Ollama's generation endpoint.
///
/// Every call is a single non-streaming attempt bounded by the configured
/// timeout. Idle connections are not pooled, so each call's connection is
/// dropped once the call returns.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
}

impl OllamaClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            // Ollama lives on the local network, never behind a proxy
            .no_proxy()
            .build()?;

        Ok(Self { client })
    }

    /// Send a generation request to the Ollama server at `base_url`.
    pub async fn generate(
        &self,
        base_url: &str,
        payload: &GenerateRequest,
    ) -> GatewayResult<GenerateResponse> {
        let api_url = generate_endpoint(base_url);
        let upstream_error = |e: reqwest::Error| GatewayError::from_upstream(e, base_url);

        let response = self
            .client
            .post(&api_url)
            .json(payload)
            .send()
            .await
            .map_err(upstream_error)?
            .error_for_status()
            .map_err(upstream_error)?;

        debug!("Ollama answered {} for {}", response.status(), api_url);

        // Reading the body counts against the same timeout
        let body = response.text().await.map_err(upstream_error)?;

        GenerateResponse::from_body(&body)
    }
}
