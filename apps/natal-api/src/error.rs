use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use natal_core::ChartError;
use serde_json::json;
use thiserror::Error;

/// Failures surfaced to HTTP clients as `{"detail": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Body(#[from] JsonRejection),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Chart(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Chart(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Body(rejection) => rejection.body_text(),
            ApiError::Chart(ChartError::Calculation(e)) => format!("Calculation error: {}", e),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            error!("natal request failed: {}", detail);
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
