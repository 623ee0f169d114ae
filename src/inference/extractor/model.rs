use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

struct BertForQuestionAnsweringImpl {
    bert: BertModel,
    qa_outputs: Linear,
}

impl BertForQuestionAnsweringImpl {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        let hidden_size = config.hidden_size;
        let qa_outputs = candle_nn::linear(hidden_size, 2, vb.pp("qa_outputs"))?;

        Ok(Self { bert, qa_outputs })
    }

    /// Returns per-token (start, end) span logits, each shaped `[seq_len]`.
    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<(Tensor, Tensor)> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let logits = self.qa_outputs.forward(&hidden)?;

        let start_logits = logits.i((0, .., 0))?;
        let end_logits = logits.i((0, .., 1))?;
        Ok((start_logits, end_logits))
    }
}

#[derive(Clone)]
pub struct SpanModel(std::sync::Arc<BertForQuestionAnsweringImpl>);

impl SpanModel {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = BertForQuestionAnsweringImpl::load(vb, &config)?;

        Ok(Self(std::sync::Arc::new(model)))
    }

    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<(Tensor, Tensor)> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}
