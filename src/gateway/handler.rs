use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::debug;

use crate::gateway::HandlerState;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{EvaluateRequest, EvaluateResponse, ReadyResponse};

/// Liveness probe.
pub async fn healthz() -> &'static str {
    "OK"
}

/// Readiness probe reporting which runtimes have real models loaded.
pub async fn ready(State(state): State<HandlerState>) -> Json<ReadyResponse> {
    let evaluator = &state.evaluator;

    Json(ReadyResponse {
        status: "ready",
        qa_model: backend_mode(evaluator.extractor().is_model_loaded()),
        embedder: backend_mode(!evaluator.embedder().is_stub()),
    })
}

/// Scores a user answer against the model answer for the passage.
///
/// Inference runs on the blocking pool so the async workers stay free.
pub async fn evaluate(
    State(state): State<HandlerState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluateResponse>, GatewayError> {
    let Json(request) =
        payload.map_err(|rejection| GatewayError::InvalidRequest(rejection.body_text()))?;

    debug!(
        context_len = request.context.len(),
        question_len = request.question.len(),
        "Evaluate request received"
    );

    let evaluator = state.evaluator.clone();
    let evaluation = tokio::task::spawn_blocking(move || {
        evaluator.evaluate(&request.context, &request.question, &request.user_answer)
    })
    .await
    .map_err(|e| GatewayError::Internal(format!("Evaluation task failed: {}", e)))??;

    Ok(Json(EvaluateResponse::from(evaluation)))
}

fn backend_mode(loaded: bool) -> &'static str {
    if loaded { "loaded" } else { "stub" }
}
