//! Extractive question answering.
//!
//! A BERT encoder with a two-logit span head selects the contiguous
//! context span most likely to answer a question. An unanswerable
//! question yields an empty string; callers decide what that means.
//!
//! Use [`ExtractorConfig::stub`] for tests/examples without model files.

pub mod config;
pub(crate) mod model;


pub use config::ExtractorConfig;

use candle_core::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::inference::device::select_device;
use crate::inference::error::InferenceError;
use crate::inference::utils::load_tokenizer_with_truncation;

use model::SpanModel;

/// Extractive QA runtime (supports stub mode).
pub struct SpanExtractor {
    device: candle_core::Device,
    config: ExtractorConfig,
    model: Option<SpanModel>,
    tokenizer: Option<Tokenizer>,
}

impl std::fmt::Debug for SpanExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanExtractor")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.model.is_some())
            .finish()
    }
}

impl SpanExtractor {
    /// Loads the extractor from a config (stub mode is supported).
    pub fn load(config: ExtractorConfig) -> Result<Self, InferenceError> {
        if let Err(reason) = config.validate() {
            return Err(InferenceError::ModelLoadFailed { reason });
        }

        let device = select_device("extractor");

        let Some(ref model_path) = config.model_path else {
            info!("No QA model path configured, extractor operating in stub mode");
            return Ok(Self {
                device,
                config,
                model: None,
                tokenizer: None,
            });
        };

        info!(model_path = %model_path.display(), "Loading QA model");

        let model = SpanModel::load(model_path, &device).map_err(|e| {
            InferenceError::ModelLoadFailed {
                reason: format!("Failed to load QA model: {}", e),
            }
        })?;

        let tokenizer = load_tokenizer_with_truncation(model_path, config.max_seq_len)
            .map_err(|e| InferenceError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        info!("QA model loaded successfully");

        Ok(Self {
            device,
            config,
            model: Some(model),
            tokenizer: Some(tokenizer),
        })
    }

    /// Loads a stub extractor.
    pub fn stub() -> Result<Self, InferenceError> {
        Self::load(ExtractorConfig::stub())
    }

    /// Returns the answer span for `question` grounded in `context`.
    ///
    /// Returns an empty string when no grounded span is found.
    pub fn answer(&self, context: &str, question: &str) -> Result<String, InferenceError> {
        debug!(
            context_len = context.len(),
            question_len = question.len(),
            model_loaded = self.model.is_some(),
            "Extracting answer span"
        );

        if let (Some(model), Some(tokenizer)) = (&self.model, &self.tokenizer) {
            return self.answer_with_model(context, question, model, tokenizer);
        }

        Ok(self.answer_stub(context, question))
    }

    /// Returns `true` if a model is loaded (false in stub mode).
    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Returns the extractor configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn answer_with_model(
        &self,
        context: &str,
        question: &str,
        model: &SpanModel,
        tokenizer: &Tokenizer,
    ) -> Result<String, InferenceError> {
        let encoding = tokenizer.encode((question, context), true).map_err(|e| {
            InferenceError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Ok(String::new());
        }

        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let (start_logits, end_logits) =
            model.forward(&input_ids, &type_ids, Some(&attention_mask))?;

        let start_scores = start_logits.to_vec1::<f32>()?;
        let end_scores = end_logits.to_vec1::<f32>()?;

        let start_idx = argmax(&start_scores);
        let end_idx = argmax(&end_scores) + 1;

        debug!(start_idx, end_idx, "Span logits decoded");

        if start_idx >= end_idx || end_idx > ids.len() {
            return Ok(String::new());
        }

        let span = &ids[start_idx..end_idx];
        tokenizer
            .decode(span, true)
            .map(|s| s.trim().to_string())
            .map_err(|e| InferenceError::InferenceFailed {
                reason: format!("Failed to decode answer span: {}", e),
            })
    }

    /// Picks the context sentence with the highest content-word overlap
    /// with the question. Deterministic, used when no model is loaded.
    fn answer_stub(&self, context: &str, question: &str) -> String {
        let question_words = content_words(question);
        if question_words.is_empty() {
            return String::new();
        }

        let mut best: Option<(usize, &str)> = None;
        for sentence in split_sentences(context) {
            let sentence_words = content_words(sentence);
            let overlap = question_words.intersection(&sentence_words).count();

            if overlap > 0 && best.is_none_or(|(score, _)| overlap > score) {
                best = Some((overlap, sentence));
            }
        }

        best.map(|(_, s)| s.trim().to_string()).unwrap_or_default()
    }
}

fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn content_words(text: &str) -> std::collections::HashSet<String> {
    const STOP_WORDS: &[&str] = &[
        "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "can",
        "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "through", "and",
        "but", "if", "or", "because", "what", "which", "who", "whom", "this", "that", "these",
        "those", "it", "its", "when", "where", "why", "how",
    ];

    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}
