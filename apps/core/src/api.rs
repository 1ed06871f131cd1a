//! HTTP surface.
//!
//! - `GET /api/get-whisper?input=...` → [`WhisperResponse`]
//! - `GET /health` → [`HealthResponse`]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::context::RequestContext;
use crate::error::AppError;
use crate::whisper::{WhisperResponse, WhisperSelector, SCORING_VERSION};

pub const INPUT_REQUIRED: &str = "Query parameter \"input\" is required.";

#[derive(Clone)]
pub struct AppState {
    selector: WhisperSelector,
}

impl AppState {
    pub fn new(selector: WhisperSelector) -> Self {
        Self { selector }
    }
}

#[derive(Debug, Deserialize)]
pub struct WhisperQuery {
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub scoring_version: u32,
    pub categories: usize,
    pub whispers: usize,
    pub fallback_loaded: bool,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = if self.is_client_error() {
            (StatusCode::BAD_REQUEST, INPUT_REQUIRED.to_string())
        } else {
            error!(error = %self, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/get-whisper", get(get_whisper))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/get-whisper
async fn get_whisper(
    State(state): State<AppState>,
    Query(query): Query<WhisperQuery>,
) -> Result<Json<WhisperResponse>, AppError> {
    let ctx = RequestContext::new();
    select(&state.selector, &ctx, query.input.as_deref())
        .map(Json)
        .inspect_err(|e| warn!(request_id = %ctx.request_id, error = %e, "Rejected whisper request"))
}

// Kept synchronous so the thread-local RNG never lives inside the handler future.
fn select(
    selector: &WhisperSelector,
    ctx: &RequestContext,
    input: Option<&str>,
) -> Result<WhisperResponse, AppError> {
    let mut rng = rand::thread_rng();
    selector.select(ctx, input, &mut rng)
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.selector.store();
    Json(HealthResponse {
        status: "ok".to_string(),
        scoring_version: SCORING_VERSION,
        categories: store.aliases.len(),
        whispers: store.pool.whisper_count(),
        fallback_loaded: store.fallback.is_loaded(),
    })
}
