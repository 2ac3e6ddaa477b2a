use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::Serialize;
use tracing::Instrument as _;

use super::Relay;
use crate::types::GenerationResult;

const INDEX_HTML: &str = include_str!("index.html");

static REQUEST_ID_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Debug)]
pub struct RelayHttpState {
    relay: Relay,
}

impl RelayHttpState {
    pub fn new(relay: Relay) -> Self {
        Self { relay }
    }

    pub fn relay(&self) -> &Relay {
        &self.relay
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

pub fn router(state: RelayHttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/generate", post(handle_generate))
        .fallback(handle_fallback)
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn handle_fallback() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse { error: "not found" }),
    )
}

async fn handle_generate(
    State(state): State<RelayHttpState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<GenerationResult>) {
    let request_id = extract_header(&headers, "x-request-id").unwrap_or_else(generate_request_id);
    let span = tracing::info_span!(
        "relay.generate",
        request_id = %request_id,
        status = tracing::field::Empty,
    );

    let reply = state
        .relay
        .handle_body(&body)
        .instrument(span.clone())
        .await;

    span.record("status", reply.status.as_u16());
    (reply.status, Json(reply.result))
}

fn extract_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn generate_request_id() -> String {
    let ts_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0);
    let seq = REQUEST_ID_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("imagine-{ts_ms}-{seq}")
}
