//! Model runtimes (candle).
//!
//! Three runtimes back the two request paths: an extractive QA model, a
//! sentence embedder, and a seq2seq generator. Each loads once at process
//! start and is read-only afterwards; each supports a deterministic stub
//! mode for running without model files.

pub mod device;
pub mod embedder;
pub mod error;
pub mod extractor;
pub mod generator;
pub(crate) mod utils;

pub use device::select_device;
pub use error::InferenceError;

/// Token budget for model inputs; longer inputs are truncated.
pub const MAX_INPUT_TOKENS: usize = 512;
