//! HTTP surface of the translation proxy
//!
//! One route, `POST /api/translate`, backed by [`TranslationProxy`]. The body is taken
//! as raw bytes and decoded by the proxy itself so that malformed JSON gets the same
//! `{"error": ...}` treatment as every other failure.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use quanqua::{ErrorBody, ProxyError, TranslationProxy};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<TranslationProxy>,
}

impl AppState {
    pub fn new(proxy: TranslationProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/translate", post(translate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn translate(State(state): State<AppState>, body: Bytes) -> Response {
    match state.proxy.handle_json(&body).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &ProxyError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or_else(|_| {
        warn!(status = err.status_code(), "Provider status is not a valid HTTP status");
        StatusCode::BAD_GATEWAY
    });
    (status, Json(ErrorBody::from(err))).into_response()
}
