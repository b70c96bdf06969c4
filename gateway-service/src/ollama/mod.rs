//! Proxy endpoint for a local Ollama server.
//!
//! `POST /api/ollama/chat` validates the client request, rewrites loopback
//! upstream addresses for container networking, forwards a single
//! non-streaming generation call, and reports the outcome as either a
//! [`ChatResponse`] or an [`ErrorResponse`](crate::error::ErrorResponse).

pub mod client;
pub mod host;
pub mod types;

use axum::{body::Bytes, extract::State, Json};
use tracing::{debug, info};

pub use client::OllamaClient;
pub use host::{generate_endpoint, rewrite_host, validate_base_url};
pub use types::{
    ChatRequest, ChatResponse, GenerateOptions, GenerateRequest, GenerateResponse,
    DEFAULT_MODEL, DEFAULT_OLLAMA_BASE_URL, DEFAULT_TEMPERATURE, EMPTY_RESPONSE_FALLBACK,
};

use crate::error::GatewayResult;
use crate::server::AppState;

/// Handle `POST /api/ollama/chat`.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> GatewayResult<Json<ChatResponse>> {
    let request = ChatRequest::from_body(&body)?;

    let base_url = rewrite_host(&request.url, &state.config().host_alias);
    validate_base_url(&base_url)?;

    let payload = GenerateRequest::from(&request);
    if let Some(system) = &payload.system {
        debug!("System prompt: {}...", preview(system, 100));
    }
    info!(
        "Calling Ollama: {} with model: {}",
        generate_endpoint(&base_url),
        request.model
    );
    debug!("Prompt: {}...", preview(&request.prompt, 100));

    let generated = state.ollama().generate(&base_url, &payload).await?;
    info!(
        "Ollama response length: {} characters",
        generated.response.chars().count()
    );

    Ok(Json(ChatResponse {
        response: generated.response,
        model: request.model,
        done: generated.done,
    }))
}

/// First `max` characters of `text`, for log lines.
pub(crate) fn preview(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
