use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::evaluation::EvaluationError;

/// Errors returned to HTTP clients as `{"error": "..."}` bodies.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<EvaluationError> for GatewayError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::MissingField { .. } => GatewayError::InvalidRequest(err.to_string()),
            EvaluationError::Inference(_) => GatewayError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            GatewayError::InvalidRequest(message) => {
                warn!(%message, "Rejected request");
                (StatusCode::BAD_REQUEST, message)
            }
            GatewayError::Internal(message) => {
                error!(%message, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
