//! Sequence-to-sequence generation (T5).
//!
//! Prompts go through the encoder once; the decoder is sampled
//! autoregressively per requested sequence with the KV cache cleared in
//! between. Candle's decoder needs `&mut self` for its cache, so the
//! model sits behind a mutex; everything else is read-only.
//!
//! Use [`GeneratorConfig::stub`] for tests/examples without model files.

pub mod config;

#[cfg(test)]
mod tests;

pub use config::{GeneratorConfig, SamplingParams};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::{LogitsProcessor, Sampling};
use candle_transformers::models::t5;
use parking_lot::Mutex;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::inference::device::select_device;
use crate::inference::error::InferenceError;
use crate::inference::utils::load_tokenizer_with_truncation;

enum GeneratorBackend {
    Model {
        model: Mutex<t5::T5ForConditionalGeneration>,
        t5_config: t5::Config,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Seq2seq text generator (supports stub mode).
pub struct QuestionGenerator {
    backend: GeneratorBackend,
    config: GeneratorConfig,
}

impl std::fmt::Debug for QuestionGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionGenerator")
            .field(
                "backend",
                &match &self.backend {
                    GeneratorBackend::Model { device, .. } => format!("Model({:?})", device),
                    GeneratorBackend::Stub => "Stub".to_string(),
                },
            )
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl QuestionGenerator {
    /// Loads the generator from a config (stub mode is supported).
    pub fn load(config: GeneratorConfig) -> Result<Self, InferenceError> {
        if let Err(reason) = config.validate() {
            return Err(InferenceError::ModelLoadFailed { reason });
        }

        let Some(ref model_path) = config.model_path else {
            info!("No generator model path configured, operating in stub mode");
            return Ok(Self {
                backend: GeneratorBackend::Stub,
                config,
            });
        };

        let device = select_device("generator");

        let config_content = std::fs::read_to_string(model_path.join("config.json"))?;
        let t5_config: t5::Config = serde_json::from_str(&config_content).map_err(|e| {
            InferenceError::ModelLoadFailed {
                reason: format!("Failed to parse generator config: {}", e),
            }
        })?;

        let weights_path = model_path.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)?
        };
        let model = t5::T5ForConditionalGeneration::load(vb, &t5_config).map_err(|e| {
            InferenceError::ModelLoadFailed {
                reason: format!("Failed to load T5 model: {}", e),
            }
        })?;

        let tokenizer = load_tokenizer_with_truncation(model_path, config.max_seq_len)
            .map_err(|e| InferenceError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        info!(model_path = %model_path.display(), "Generator model loaded successfully");

        Ok(Self {
            backend: GeneratorBackend::Model {
                model: Mutex::new(model),
                t5_config,
                tokenizer,
                device,
            },
            config,
        })
    }

    /// Loads a stub generator.
    pub fn stub() -> Result<Self, InferenceError> {
        Self::load(GeneratorConfig::stub())
    }

    /// Generates `params.num_return_sequences` completions for `prompt`.
    ///
    /// Completions are returned trimmed but otherwise untouched;
    /// deduplication is the caller's concern.
    pub fn generate(
        &self,
        prompt: &str,
        params: &SamplingParams,
    ) -> Result<Vec<String>, InferenceError> {
        debug!(
            prompt_len = prompt.len(),
            sequences = params.num_return_sequences,
            max_new_tokens = params.max_new_tokens,
            "Generating completions"
        );

        match &self.backend {
            GeneratorBackend::Model {
                model,
                t5_config,
                tokenizer,
                device,
            } => self.generate_with_model(prompt, params, model, t5_config, tokenizer, device),
            GeneratorBackend::Stub => Ok(self.generate_stub(prompt, params)),
        }
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, GeneratorBackend::Stub)
    }

    /// Returns the generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn generate_with_model(
        &self,
        prompt: &str,
        params: &SamplingParams,
        model: &Mutex<t5::T5ForConditionalGeneration>,
        t5_config: &t5::Config,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<String>, InferenceError> {
        let encoding =
            tokenizer
                .encode(prompt, true)
                .map_err(|e| InferenceError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;

        let mut completions = Vec::with_capacity(params.num_return_sequences);
        let mut model = model.lock();

        for sequence in 0..params.num_return_sequences {
            model.clear_kv_cache();
            let encoder_output = model.encode(&input_ids)?;

            let mut logits_processor = LogitsProcessor::from_sampling(
                params.seed.wrapping_add(sequence as u64),
                sampling_for(params),
            );

            let decoder_start =
                t5_config.decoder_start_token_id.unwrap_or(t5_config.pad_token_id) as u32;
            let mut output_token_ids = vec![decoder_start];

            for step in 0..params.max_new_tokens {
                let decoder_token_ids = if step == 0 || !t5_config.use_cache {
                    Tensor::new(output_token_ids.as_slice(), device)?.unsqueeze(0)?
                } else {
                    // With the KV cache warm only the last token is fed.
                    let last = *output_token_ids.last().unwrap_or(&decoder_start);
                    Tensor::new(&[last], device)?.unsqueeze(0)?
                };

                let logits = model.decode(&decoder_token_ids, &encoder_output)?.squeeze(0)?;
                let logits = if params.repetition_penalty == 1.0 {
                    logits
                } else {
                    candle_transformers::utils::apply_repeat_penalty(
                        &logits,
                        params.repetition_penalty,
                        &output_token_ids,
                    )?
                };

                let next_token_id = logits_processor.sample(&logits)?;
                if next_token_id as usize == t5_config.eos_token_id {
                    break;
                }
                output_token_ids.push(next_token_id);
            }

            let text = tokenizer
                .decode(&output_token_ids[1..], true)
                .map_err(|e| InferenceError::InferenceFailed {
                    reason: format!("Failed to decode completion: {}", e),
                })?;

            completions.push(text.trim().to_string());
        }

        Ok(completions)
    }

    /// Deterministic prompt-derived completions used when no model is
    /// loaded. Sequences differ from each other but repeat across calls.
    fn generate_stub(&self, prompt: &str, params: &SamplingParams) -> Vec<String> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let words: Vec<&str> = prompt
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 3)
            .collect();

        let mut hasher = DefaultHasher::new();
        prompt.hash(&mut hasher);
        params.seed.hash(&mut hasher);
        let base = hasher.finish() as usize;

        let mut completions: Vec<String> = Vec::with_capacity(params.num_return_sequences);
        for i in 0..params.num_return_sequences {
            let mut text = if words.is_empty() {
                format!("completion {}", i + 1)
            } else {
                let start = (base + i) % words.len();
                let picked: Vec<&str> = (0..3.min(words.len()))
                    .map(|offset| words[(start + offset * 3) % words.len()])
                    .collect();
                picked.join(" ")
            };

            // Keep sequences distinct so callers exercise real dedup paths.
            if completions.contains(&text) {
                text = format!("{} {}", text, i + 1);
            }
            completions.push(text);
        }

        completions
    }
}

fn sampling_for(params: &SamplingParams) -> Sampling {
    match (params.temperature, params.top_k, params.top_p) {
        (None, _, _) => Sampling::ArgMax,
        (Some(temperature), None, None) => Sampling::All { temperature },
        (Some(temperature), Some(k), None) => Sampling::TopK { k, temperature },
        (Some(temperature), None, Some(p)) => Sampling::TopP { p, temperature },
        (Some(temperature), Some(k), Some(p)) => Sampling::TopKThenTopP { k, p, temperature },
    }
}
