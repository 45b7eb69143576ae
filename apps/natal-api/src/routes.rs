use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::warn;
use natal_core::{ChartAssembler, ChartRequest, ChartResult};
use serde_json::{json, Value};
use std::sync::Arc;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared by every handler; immutable after startup.
#[derive(Clone)]
pub struct AppState {
    assembler: ChartAssembler,
    api_key: Option<Arc<str>>,
}

impl AppState {
    /// A blank `api_key` leaves `/natal` open.
    pub fn new(assembler: ChartAssembler, api_key: Option<String>) -> Self {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .map(Arc::from);
        Self { assembler, api_key }
    }
}

pub fn router(state: AppState) -> Router {
    let natal = Router::new()
        .route("/natal", post(natal))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/healthz", get(healthz))
        .merge(natal)
        .with_state(state)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn natal(
    State(state): State<AppState>,
    payload: Result<Json<ChartRequest>, JsonRejection>,
) -> Result<Json<ChartResult>, ApiError> {
    let Json(request) = payload?;
    // Runs inline: the runtime is single-threaded, so the engine is never re-entered.
    let chart = state.assembler.assemble(&request)?;
    Ok(Json(chart))
}

/// Runs before the body is read.
async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.api_key.as_deref() {
        let supplied = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if supplied != Some(expected) {
            warn!("rejected {} without a valid api key", request.uri().path());
            return Err(ApiError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}
