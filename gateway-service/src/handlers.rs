//! Health probe and echo endpoints.

use axum::{
    body::Bytes,
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{GatewayError, GatewayResult};

#[derive(Debug, Deserialize)]
pub struct HelloQuery {
    name: Option<String>,
}

/// `GET /api/health`
pub async fn health() -> (StatusCode, Json<Value>) {
    info!("Health check called");
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "message": "Backend is running"
        })),
    )
}

/// `GET /api/hello?name=...`
///
/// `timestamp` echoes the request's `Date` header, or null without one.
pub async fn hello(Query(query): Query<HelloQuery>, headers: HeaderMap) -> Json<Value> {
    let name = query.name.unwrap_or_else(|| "World".to_string());
    info!("Hello endpoint called with name: {}", name);

    let timestamp = headers
        .get(header::DATE)
        .and_then(|value| value.to_str().ok());

    Json(json!({
        "message": format!("Hello, {}!", name),
        "timestamp": timestamp
    }))
}

/// `POST /api/data`
pub async fn create_data(body: Bytes) -> GatewayResult<(StatusCode, Json<Value>)> {
    let received: Value = serde_json::from_slice(&body).map_err(|_| {
        GatewayError::BadRequest("Request body must be valid JSON".to_string())
    })?;
    info!("Data received: {}", received);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "received": received,
            "status": "success"
        })),
    ))
}
