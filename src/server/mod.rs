//! HTTP surface of the relay: `POST /api/extract-transcript` and `GET /health`.

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::relay::{ErrorBody, ExtractRequest, TranscriptRelay};
use crate::{RelayError, Result};

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            tracing::warn!(error = %self, "Rejected transcript request");
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self, "Transcript extraction failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = ErrorBody {
            error: self.public_message().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Build the relay router
pub fn router(relay: TranscriptRelay) -> Router {
    Router::new()
        .route("/api/extract-transcript", post(extract_transcript))
        .route("/health", get(health_handler))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(relay))
}

/// Relay HTTP server
pub struct RelayServer {
    addr: SocketAddr,
    relay: TranscriptRelay,
}

impl RelayServer {
    pub fn new(addr: SocketAddr, relay: TranscriptRelay) -> Self {
        Self { addr, relay }
    }

    /// Bind and serve until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;

        serve(listener, self.relay).await
    }
}

/// Serve the relay on an already bound listener until Ctrl-C
pub async fn serve(listener: TcpListener, relay: TranscriptRelay) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "Relay server listening");

    axum::serve(listener, router(relay))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Relay server failed")?;

    info!("Relay server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "ok"
}

async fn extract_transcript(State(relay): State<Arc<TranscriptRelay>>, body: Bytes) -> Response {
    let span = tracing::info_span!("extract_transcript", request_id = %Uuid::new_v4());

    async move {
        info!(body_len = body.len(), "Received transcript extraction request");
        tracing::debug!("Request body: {}", String::from_utf8_lossy(&body));

        let request = match ExtractRequest::from_body(&body) {
            Ok(request) => request,
            Err(e) => return e.into_response(),
        };

        match relay.extract(request.url.as_deref()).await {
            Ok(result) => {
                info!("Sending transcript response");
                (StatusCode::OK, Json(result)).into_response()
            }
            Err(e) => e.into_response(),
        }
    }
    .instrument(span)
    .await
}

fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Handler panicked while extracting transcript");
    RelayError::Internal("handler panicked".to_string()).into_response()
}
