use std::path::PathBuf;

use crate::inference::MAX_INPUT_TOKENS;

/// Configuration for [`QuestionGenerator`](super::QuestionGenerator).
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory holding `config.json`, `model.safetensors` and
    /// `tokenizer.json`. `None` selects stub mode.
    pub model_path: Option<PathBuf>,
    /// Max tokens for the encoder input.
    pub max_seq_len: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: MAX_INPUT_TOKENS,
        }
    }
}

impl GeneratorConfig {
    /// Env var used to locate the generator model directory.
    pub const ENV_MODEL_PATH: &'static str = "QUIZMILL_GENERATOR_PATH";

    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    /// Creates a stub config (deterministic completions, no model files).
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
            return Err(format!(
                "Generator model path not found: {}",
                path.display()
            ));
        }
        for file in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !path.join(file).exists() {
                return Err(format!("Missing {} in {}", file, path.display()));
            }
        }

        Ok(())
    }
}

/// Decoding parameters for one generation call.
#[derive(Debug, Clone)]
pub struct SamplingParams {
    /// Cap on generated tokens per sequence.
    pub max_new_tokens: usize,
    /// Number of completions to produce.
    pub num_return_sequences: usize,
    /// Softmax temperature. `None` selects greedy decoding.
    pub temperature: Option<f64>,
    /// Top-k filtering (only with a temperature).
    pub top_k: Option<usize>,
    /// Nucleus (top-p) filtering (only with a temperature).
    pub top_p: Option<f64>,
    /// Penalty applied to already-generated tokens. `1.0` disables it.
    pub repetition_penalty: f32,
    /// Base RNG seed; sequence `i` uses `seed + i`.
    pub seed: u64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 100,
            num_return_sequences: 1,
            temperature: None,
            top_k: None,
            top_p: None,
            repetition_penalty: 1.0,
            seed: 299792458,
        }
    }
}

impl SamplingParams {
    /// Greedy decoding of a single sequence.
    pub fn greedy(max_new_tokens: usize) -> Self {
        Self {
            max_new_tokens,
            ..Default::default()
        }
    }
}
