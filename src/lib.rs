//! Quizmill library crate (used by the server and CLI binaries).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`AnswerEvaluator`], [`Evaluation`], [`Feedback`] - Answer scoring
//! - [`QuizBuilder`], [`QuizOutput`], [`McqItem`] - Question generation
//!
//! ## Inference
//! - [`SpanExtractor`], [`ExtractorConfig`] - Extractive question answering
//! - [`SentenceEmbedder`], [`EmbedderConfig`] - Sentence embeddings
//! - [`QuestionGenerator`], [`GeneratorConfig`], [`SamplingParams`] - Seq2seq generation
//!
//! ## Utilities
//! - [`context`] - Context input normalization (UTF-8 / base64)
//! - [`cosine_similarity`] - Similarity of normalized embeddings
//!
//! All model runtimes support a deterministic stub mode so the full request
//! paths can run (and be tested) without model files on disk.

pub mod config;
pub mod context;
pub mod evaluation;
pub mod gateway;
pub mod inference;
pub mod quiz;

pub use config::{Config, ConfigError};
pub use context::{ContextError, normalize_context, read_context};
pub use evaluation::{AnswerEvaluator, Evaluation, EvaluationError, Feedback};
pub use inference::embedder::{EMBEDDER_DIM, EmbedderConfig, SentenceEmbedder, cosine_similarity};
pub use inference::extractor::{ExtractorConfig, SpanExtractor};
pub use inference::generator::{GeneratorConfig, QuestionGenerator, SamplingParams};
pub use inference::{InferenceError, MAX_INPUT_TOKENS};
pub use quiz::{McqItem, QuestionKind, QuizBuilder, QuizError, QuizOutput};
