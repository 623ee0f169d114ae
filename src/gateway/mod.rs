//! HTTP gateway.
//!
//! Routes:
//! - `GET /healthz` liveness probe
//! - `GET /ready` readiness with per-model backend modes
//! - `POST /evaluate` answer evaluation

pub mod error;
pub mod handler;
pub mod payload;

#[cfg(test)]
mod handler_tests;

pub use error::GatewayError;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::evaluation::AnswerEvaluator;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct HandlerState {
    pub evaluator: Arc<AnswerEvaluator>,
}

impl HandlerState {
    pub fn new(evaluator: AnswerEvaluator) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
        }
    }
}

/// Builds the application router.
pub fn router(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(handler::healthz))
        .route("/ready", get(handler::ready))
        .route("/evaluate", post(handler::evaluate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
