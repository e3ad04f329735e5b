//! BERT sequence-classification rating classifier
//!
//! Wraps a pretrained 5-class BERT checkpoint: tokenize to a fixed
//! length, forward pass, argmax over the logits, map class index 0..4
//! to a rating 1..5. The model is loaded once and held read-only for
//! the process lifetime; inference mutates nothing.

use crate::classifier::RatingClassifier;
use crate::config::{ClassifierConfig, DeviceKind};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use dishrate_core::Result;
use std::path::Path;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

/// Number of output classes (ratings 1 through 5).
const NUM_LABELS: usize = 5;

pub struct BertRatingClassifier {
    name: String,
    tokenizer: Tokenizer,
    bert: BertModel,
    pooler: Linear,
    head: Linear,
    device: Device,
}

impl std::fmt::Debug for BertRatingClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertRatingClassifier")
            .field("name", &self.name)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl BertRatingClassifier {
    /// Load the model from a directory containing `config.json`,
    /// `tokenizer.json` and the weights (`model.safetensors` or
    /// `pytorch_model.bin`).
    ///
    /// Loading failure is fatal to the caller by design: the service
    /// must not come up without a working classifier.
    pub fn load(model_dir: impl AsRef<Path>, config: &ClassifierConfig) -> Result<Self> {
        let model_dir = model_dir.as_ref();

        let tokenizer = load_tokenizer(&model_dir.join("tokenizer.json"), config.max_length)?;

        let bert_config: BertConfig = serde_json::from_str(
            &std::fs::read_to_string(model_dir.join("config.json")).map_err(|e| {
                dishrate_core::Error::classifier(format!("Failed to read model config: {e}"))
            })?,
        )
        .map_err(|e| {
            dishrate_core::Error::classifier(format!("Failed to parse model config: {e}"))
        })?;

        let device = create_device(config.device)?;
        let vb = load_weights(model_dir, &device)?;

        let bert = BertModel::load(vb.pp("bert"), &bert_config)
            .map_err(|e| dishrate_core::Error::classifier(format!("Failed to load BERT: {e}")))?;

        let hidden = bert_config.hidden_size;
        let pooler = candle_nn::linear(hidden, hidden, vb.pp("bert").pp("pooler").pp("dense"))
            .map_err(|e| dishrate_core::Error::classifier(format!("Failed to load pooler: {e}")))?;
        let head = candle_nn::linear(hidden, NUM_LABELS, vb.pp("classifier")).map_err(|e| {
            dishrate_core::Error::classifier(format!("Failed to load classification head: {e}"))
        })?;

        tracing::info!(
            "Loaded BERT rating classifier from {} ({} labels, max length {})",
            model_dir.display(),
            NUM_LABELS,
            config.max_length
        );

        Ok(Self {
            name: "bert-rating".to_string(),
            tokenizer,
            bert,
            pooler,
            head,
            device,
        })
    }

    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| dishrate_core::Error::classifier(format!("Tokenization failed: {e}")))?;

        let input_ids = tensor_row(encoding.get_ids(), &self.device)?;
        let token_type_ids = tensor_row(encoding.get_type_ids(), &self.device)?;
        let attention_mask = tensor_row(encoding.get_attention_mask(), &self.device)?;

        let sequence_output = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| {
                dishrate_core::Error::classifier(format!("Model forward pass failed: {e}"))
            })?;

        // Pooled [CLS] representation, then the classification head.
        let logits = sequence_output
            .i((.., 0))
            .and_then(|cls| self.pooler.forward(&cls))
            .and_then(|pooled| pooled.tanh())
            .and_then(|pooled| self.head.forward(&pooled))
            .map_err(|e| {
                dishrate_core::Error::classifier(format!("Classification head failed: {e}"))
            })?;

        logits
            .squeeze(0)
            .and_then(|logits| logits.to_dtype(DType::F32))
            .and_then(|logits| logits.to_vec1::<f32>())
            .map_err(|e| {
                dishrate_core::Error::classifier(format!("Failed to read logits: {e}"))
            })
    }
}

#[async_trait::async_trait]
impl RatingClassifier for BertRatingClassifier {
    async fn classify(&self, text: &str) -> Result<u8> {
        let logits = self.logits(text)?;
        if logits.len() != NUM_LABELS {
            return Err(dishrate_core::Error::classifier(format!(
                "Expected {NUM_LABELS} logits, got {}",
                logits.len()
            )));
        }
        // Labels start from 0, ratings from 1.
        Ok(argmax(&logits) as u8 + 1)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Index of the maximum value, ties broken by the lowest index.
fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

fn tensor_row(values: &[u32], device: &Device) -> Result<Tensor> {
    Tensor::new(values, device)
        .and_then(|t| t.unsqueeze(0))
        .map_err(|e| dishrate_core::Error::classifier(format!("Failed to build tensor: {e}")))
}

/// Load the tokenizer configured for a fixed sequence length:
/// truncate longer input silently, pad shorter input to `max_length`.
fn load_tokenizer(path: &Path, max_length: usize) -> Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(path)
        .map_err(|e| dishrate_core::Error::classifier(format!("Failed to load tokenizer: {e}")))?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| {
            dishrate_core::Error::classifier(format!("Failed to configure truncation: {e}"))
        })?;
    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::Fixed(max_length),
        ..Default::default()
    }));

    Ok(tokenizer)
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device) }
            .map_err(|e| {
                dishrate_core::Error::classifier(format!("Failed to load safetensors: {e}"))
            });
    }

    let pth = model_dir.join("pytorch_model.bin");
    if pth.exists() {
        return VarBuilder::from_pth(&pth, DType::F32, device).map_err(|e| {
            dishrate_core::Error::classifier(format!("Failed to load PyTorch weights: {e}"))
        });
    }

    Err(dishrate_core::Error::config(format!(
        "No model weights found in {} (expected model.safetensors or pytorch_model.bin)",
        model_dir.display()
    )))
}

/// Create Candle device from device kind
fn create_device(kind: DeviceKind) -> Result<Device> {
    match kind {
        DeviceKind::Cpu => Ok(Device::Cpu),
        DeviceKind::Cuda => Device::new_cuda(0).map_err(|e| {
            dishrate_core::Error::classifier(format!("Failed to create CUDA device: {e}"))
        }),
        DeviceKind::Metal => Device::new_metal(0).map_err(|e| {
            dishrate_core::Error::classifier(format!("Failed to create Metal device: {e}"))
        }),
    }
}
