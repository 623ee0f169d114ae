use serde::{Deserialize, Serialize};

use crate::evaluation::Evaluation;

/// Body of `POST /evaluate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub user_answer: String,
}

/// Response of `POST /evaluate`.
///
/// `similarity_score` repeats `score` for clients that predate the
/// `score` field.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub model_answer: String,
    pub user_answer: String,
    pub score: f64,
    pub similarity_score: f64,
    pub feedback: &'static str,
}

impl From<Evaluation> for EvaluateResponse {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            model_answer: evaluation.model_answer,
            user_answer: evaluation.user_answer,
            score: evaluation.score,
            similarity_score: evaluation.score,
            feedback: evaluation.feedback.as_str(),
        }
    }
}

/// Response of `GET /ready`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub status: &'static str,
    pub qa_model: &'static str,
    pub embedder: &'static str,
}
