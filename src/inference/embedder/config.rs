use std::path::PathBuf;

use crate::inference::MAX_INPUT_TOKENS;

/// Default embedding dimension (MiniLM-class sentence encoders).
pub const EMBEDDER_DIM: usize = 384;

/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Directory holding `config.json`, `model.safetensors` and
    /// `tokenizer.json`. `None` selects stub mode.
    pub model_path: Option<PathBuf>,
    /// Max tokens to consider.
    pub max_seq_len: usize,
    /// Output embedding dimension (only used by the stub; the model's
    /// hidden size wins when a model is loaded).
    pub embedding_dim: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: MAX_INPUT_TOKENS,
            embedding_dim: EMBEDDER_DIM,
        }
    }
}

impl EmbedderConfig {
    /// Env var used to locate the embedding model directory.
    pub const ENV_MODEL_PATH: &'static str = "QUIZMILL_EMBEDDER_PATH";

    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    /// Creates a stub config (deterministic embeddings, no model files).
    pub fn stub() -> Self {
        Self::default()
    }

    /// Loads config from the environment (missing var selects stub mode).
    pub fn from_env() -> Self {
        let model_path = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            model_path,
            ..Default::default()
        }
    }

    /// Validates the model directory for non-stub mode.
    pub fn validate(&self) -> Result<(), String> {
        let Some(ref path) = self.model_path else {
            return Ok(());
        };

        if !path.exists() {
            return Err(format!("Embedder model path not found: {}", path.display()));
        }
        for file in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !path.join(file).exists() {
                return Err(format!("Missing {} in {}", file, path.display()));
            }
        }

        Ok(())
    }
}
