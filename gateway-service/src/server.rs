//! HTTP server for the gateway.
//!
//! Builds the router, initializes tracing and serves requests until the
//! process receives Ctrl-C.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::{
    config::GatewayConfig, handlers, ollama, LogLevel, Result, ServiceError, ServiceOptions,
};

/// Shared application state.
///
/// Everything in here is read-only once the server is running.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration
    config: Arc<GatewayConfig>,

    /// Client for the upstream Ollama server
    ollama: ollama::OllamaClient,
}

impl AppState {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let ollama = ollama::OllamaClient::new(config.upstream_timeout)
            .map_err(|e| ServiceError::ServerError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config: Arc::new(config.clone()),
            ollama,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn ollama(&self) -> &ollama::OllamaClient {
        &self.ollama
    }
}

/// Build the router with every endpoint and middleware.
pub fn router(config: &GatewayConfig) -> Result<Router> {
    let state = AppState::new(config)?;

    Ok(Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/hello", get(handlers::hello))
        .route("/api/data", post(handlers::create_data))
        .route("/api/ollama/chat", post(ollama::chat))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(trace_layer()))
}

/// Request logging at INFO, so every request shows up at the normal log level.
fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

/// Run the HTTP server with the provided options.
pub async fn run_server(options: ServiceOptions) -> Result<()> {
    if options.init_tracing {
        init_tracing(options.log_level);
    }

    if options.gateway.uses_default_secret() {
        warn!("SECRET_KEY is not set, using the development default");
    }

    let app = router(&options.gateway)?;

    info!("Starting gateway service on {}", options.bind_address);
    let listener = tokio::net::TcpListener::bind(options.bind_address)
        .await
        .map_err(|e| ServiceError::ServerError(format!("Failed to bind to address: {}", e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServiceError::ServerError(format!("Server error: {}", e)))?;

    info!("Gateway service stopped");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the level derived from the options.
fn init_tracing(log_level: LogLevel) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter(log_level)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn log_filter(log_level: LogLevel) -> &'static str {
    match log_level {
        LogLevel::Debug => "gateway_service=debug,tower_http=debug",
        LogLevel::Normal => "gateway_service=info,tower_http=info",
        LogLevel::Quiet => "gateway_service=error,tower_http=error",
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_requests_logged_at_normal_level() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(log_filter(LogLevel::Normal)))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        // current_thread runtime: the server task is polled on this thread
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = router(&GatewayConfig::default()).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let response = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap()
            .get(format!("http://{}/api/hello?name=x", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("tower_http"), "no request log lines in:\n{}", logs);
        assert!(logs.contains("/api/hello"), "request path not logged in:\n{}", logs);
        assert!(logs.contains("finished processing request"), "no response line in:\n{}", logs);
    }

    #[test]
    fn test_log_filters() {
        assert_eq!(log_filter(LogLevel::Normal), "gateway_service=info,tower_http=info");
        assert!(log_filter(LogLevel::Quiet).contains("tower_http=error"));
        assert!(log_filter(LogLevel::Debug).contains("gateway_service=debug"));
    }
}
