//! Answer evaluation.
//!
//! An evaluator derives a reference answer from the context with the span
//! extractor, embeds both answers, and converts cosine similarity into a
//! 0-100 score with a feedback category.


use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::inference::embedder::{SentenceEmbedder, cosine_similarity};
use crate::inference::error::InferenceError;
use crate::inference::extractor::SpanExtractor;

/// Errors surfaced while evaluating an answer.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Missing field: {field}")]
    MissingField { field: &'static str },

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
}

/// Feedback category for a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Feedback {
    #[serde(rename = "Excellent match with the expected answer!")]
    Excellent,
    #[serde(rename = "Good answer, but could be more precise.")]
    Good,
    #[serde(rename = "Partial match. Review key concepts.")]
    Partial,
    #[serde(rename = "Significant differences detected. Needs improvement.")]
    NeedsImprovement,
}

impl Feedback {
    /// Maps a 0-100 score to its category. Bucket floors are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Feedback::Excellent
        } else if score >= 70.0 {
            Feedback::Good
        } else if score >= 50.0 {
            Feedback::Partial
        } else {
            Feedback::NeedsImprovement
        }
    }

    /// Returns the user-facing feedback message.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::Excellent => "Excellent match with the expected answer!",
            Feedback::Good => "Good answer, but could be more precise.",
            Feedback::Partial => "Partial match. Review key concepts.",
            Feedback::NeedsImprovement => "Significant differences detected. Needs improvement.",
        }
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating a user answer against the model's answer.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// Reference answer extracted from the context.
    pub model_answer: String,
    /// The answer being graded, as submitted.
    pub user_answer: String,
    /// Similarity score in [0, 100], rounded to two decimals.
    pub score: f64,
    /// Category derived from the score.
    pub feedback: Feedback,
}

/// Scores user answers against model-derived reference answers.
#[derive(Debug)]
pub struct AnswerEvaluator {
    extractor: SpanExtractor,
    embedder: SentenceEmbedder,
}

impl AnswerEvaluator {
    /// Creates an evaluator from already-loaded runtimes.
    pub fn new(extractor: SpanExtractor, embedder: SentenceEmbedder) -> Self {
        Self {
            extractor,
            embedder,
        }
    }

    /// Creates a stub evaluator (no model files required).
    pub fn stub() -> Result<Self, InferenceError> {
        Ok(Self::new(SpanExtractor::stub()?, SentenceEmbedder::stub()?))
    }

    /// Evaluates `user_answer` for `question` against `context`.
    pub fn evaluate(
        &self,
        context: &str,
        question: &str,
        user_answer: &str,
    ) -> Result<Evaluation, EvaluationError> {
        if context.trim().is_empty() {
            return Err(EvaluationError::MissingField { field: "context" });
        }
        if question.trim().is_empty() {
            return Err(EvaluationError::MissingField { field: "question" });
        }
        let user_answer = user_answer.trim();
        if user_answer.is_empty() {
            return Err(EvaluationError::MissingField { field: "userAnswer" });
        }

        let model_answer = self.extractor.answer(context, question)?;
        debug!(model_answer_len = model_answer.len(), "Reference answer extracted");

        let model_embedding = self.embedder.embed(&model_answer)?;
        let user_embedding = self.embedder.embed(user_answer)?;

        let similarity = cosine_similarity(&model_embedding, &user_embedding);
        let score = score_from_similarity(similarity);
        let feedback = Feedback::from_score(score);

        info!(score, ?feedback, "Answer evaluated");

        Ok(Evaluation {
            model_answer,
            user_answer: user_answer.to_string(),
            score,
            feedback,
        })
    }

    /// Returns `true` if both runtimes have real models loaded.
    pub fn is_model_backed(&self) -> bool {
        self.extractor.is_model_loaded() && !self.embedder.is_stub()
    }

    /// Returns the underlying span extractor.
    pub fn extractor(&self) -> &SpanExtractor {
        &self.extractor
    }

    /// Returns the underlying sentence embedder.
    pub fn embedder(&self) -> &SentenceEmbedder {
        &self.embedder
    }
}

/// Converts a cosine similarity into a 0-100 score.
///
/// Negative similarities count as no match. The score is rounded to two
/// decimal places so it is stable across serialization.
fn score_from_similarity(similarity: f32) -> f64 {
    let clamped = similarity.clamp(0.0, 1.0) as f64;
    (clamped * 100.0 * 100.0).round() / 100.0
}
