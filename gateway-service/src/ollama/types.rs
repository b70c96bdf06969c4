//! Request and response types for the chat endpoint and Ollama's
//! `/api/generate` route.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::error::{GatewayError, GatewayResult};

/// Default Ollama base URL
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default model: llama3.2
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Text returned in place of an empty upstream response
pub const EMPTY_RESPONSE_FALLBACK: &str = "No response from Ollama";

/// Body of `POST /api/ollama/chat` as sent by the client.
///
/// Every field is optional on the wire; `null` counts as absent.
#[derive(Debug, Deserialize)]
struct ChatRequestBody {
    url: Option<String>,
    model: Option<String>,
    prompt: Option<String>,
    system: Option<String>,
    temperature: Option<f64>,
}

/// A validated chat request with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Upstream base URL, before host rewriting
    pub url: String,
    pub model: String,
    /// Never empty
    pub prompt: String,
    /// Optional system instruction, never empty when present
    pub system: Option<String>,
    pub temperature: f64,
}

impl ChatRequest {
    /// Parse and validate a raw request body.
    ///
    /// An empty body, invalid JSON, or JSON that is not an object is reported
    /// as a missing body. Fields with the wrong type are rejected rather than
    /// coerced.
    pub fn from_body(body: &[u8]) -> GatewayResult<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|_| GatewayError::body_required())?;
        if !value.is_object() {
            return Err(GatewayError::body_required());
        }

        let body: ChatRequestBody = serde_json::from_value(value)
            .map_err(|e| GatewayError::BadRequest(format!("Invalid request body: {}", e)))?;

        let prompt = body
            .prompt
            .filter(|prompt| !prompt.is_empty())
            .ok_or_else(GatewayError::prompt_required)?;

        Ok(Self {
            url: body.url.unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
            model: body.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            prompt,
            system: body.system.filter(|system| !system.is_empty()),
            temperature: body.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        })
    }
}

/// Sampling options forwarded to Ollama
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerateOptions {
    pub temperature: f64,
}

/// Payload for Ollama's `/api/generate` endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Always false, streaming responses are not supported
    pub stream: bool,
    pub options: GenerateOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl From<&ChatRequest> for GenerateRequest {
    fn from(request: &ChatRequest) -> Self {
        Self {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
            },
            system: request.system.clone(),
        }
    }
}

/// The parts of an Ollama generation reply the gateway passes on.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    /// Generated text, or [`EMPTY_RESPONSE_FALLBACK`]
    pub response: String,
    pub done: bool,
}

impl GenerateResponse {
    /// Interpret the raw body of a successful upstream reply.
    pub fn from_body(body: &str) -> GatewayResult<Self> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            error!(
                "Failed to parse Ollama JSON response: {}. Response: {}",
                e,
                super::preview(body, 500)
            );
            GatewayError::UpstreamProtocol(e.to_string())
        })?;

        let result = value.as_object().ok_or_else(|| {
            GatewayError::Internal("Ollama response is not a JSON object".to_string())
        })?;

        let text = result
            .get("response")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let response = if text.is_empty() {
            warn!("Ollama returned empty response. Full result: {}", value);
            EMPTY_RESPONSE_FALLBACK.to_string()
        } else {
            text.to_string()
        };

        Ok(Self {
            response,
            done: result.get("done").and_then(Value::as_bool).unwrap_or(true),
        })
    }
}

/// Successful reply of `POST /api/ollama/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    /// The model the client asked for
    pub model: String,
    pub done: bool,
}
