//! Sentence embeddings for semantic similarity.
//!
//! A MiniLM-class BERT encoder with attention-mask mean pooling and L2
//! normalization. Cosine similarity of two normalized embeddings is their
//! dot product.
//!
//! Use [`EmbedderConfig::stub`] for tests/examples without model files.

pub mod config;

#[cfg(test)]
mod tests;

pub use config::{EMBEDDER_DIM, EmbedderConfig};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::inference::device::select_device;
use crate::inference::error::InferenceError;
use crate::inference::utils::load_tokenizer_with_truncation;

enum EmbedderBackend {
    Model {
        model: BertModel,
        tokenizer: Tokenizer,
        device: Device,
        hidden_size: usize,
    },
    Stub,
}

/// Sentence embedding generator (supports stub mode).
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: EmbedderConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.embedding_dim())
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: EmbedderConfig) -> Result<Self, InferenceError> {
        if let Err(reason) = config.validate() {
            return Err(InferenceError::ModelLoadFailed { reason });
        }

        let Some(ref model_path) = config.model_path else {
            info!("No embedder model path configured, operating in stub mode");
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        };

        let device = select_device("embedder");

        let config_content = std::fs::read_to_string(model_path.join("config.json"))?;
        let bert_config: BertConfig = serde_json::from_str(&config_content).map_err(|e| {
            InferenceError::ModelLoadFailed {
                reason: format!("Failed to parse embedder config: {}", e),
            }
        })?;
        let hidden_size = bert_config.hidden_size;

        let weights_path = model_path.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)?
        };
        let model = BertModel::load(vb, &bert_config)?;

        let tokenizer = load_tokenizer_with_truncation(model_path, config.max_seq_len)
            .map_err(|e| InferenceError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        info!(
            model_path = %model_path.display(),
            hidden_size,
            "Embedding model loaded successfully"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                model,
                tokenizer,
                device,
                hidden_size,
            },
            config,
        })
    }

    /// Loads a stub embedder.
    pub fn stub() -> Result<Self, InferenceError> {
        Self::load(EmbedderConfig::stub())
    }

    /// Generates an L2-normalized embedding for a single string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, InferenceError> {
        match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
                ..
            } => self.embed_with_model(text, model, tokenizer, device),
            EmbedderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    /// Returns the output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        match &self.backend {
            EmbedderBackend::Model { hidden_size, .. } => *hidden_size,
            EmbedderBackend::Stub => self.config.embedding_dim,
        }
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &BertModel,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, InferenceError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| InferenceError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Ok(vec![0.0; self.embedding_dim()]);
        }

        let input_ids = Tensor::new(ids, device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        // hidden shape: [1, seq_len, hidden_size]
        let hidden = model.forward(&input_ids, &type_ids, Some(&attention_mask))?;

        // Mean pooling over non-padding positions.
        let mask = attention_mask
            .to_dtype(DType::F32)?
            .unsqueeze(2)?
            .broadcast_as(hidden.shape())?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::INFINITY)?;
        let pooled = summed.broadcast_div(&counts)?;

        let embedding = pooled.squeeze(0)?.to_vec1::<f32>()?;
        Ok(normalize(embedding))
    }

    /// Deterministic hash-seeded embedding used when no model is loaded.
    fn embed_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        debug!(text_len = text.len(), "Generating stub embedding");

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.config.embedding_dim);
        let mut state = seed;

        for _ in 0..self.config.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        normalize(embedding)
    }
}

/// Cosine similarity of two embeddings, in [-1, 1].
///
/// Embeddings from [`SentenceEmbedder::embed`] are already normalized, but
/// the norms are recomputed so arbitrary vectors are handled too.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
