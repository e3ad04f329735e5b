//! Classifier configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the rating classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Which classifier implementation to load
    #[serde(default)]
    pub kind: ClassifierKind,

    /// Where the model artifacts live (BERT only)
    #[serde(default)]
    pub source: ModelSource,

    /// Device to run inference on
    #[serde(default)]
    pub device: DeviceKind,

    /// Fixed token length; longer input is silently truncated
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            kind: ClassifierKind::default(),
            source: ModelSource::default(),
            device: DeviceKind::default(),
            max_length: default_max_length(),
        }
    }
}

fn default_max_length() -> usize {
    200
}

/// Classifier implementation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Candle BERT sequence classification (5 labels)
    #[default]
    Bert,
    /// Lexicon-based fallback, no model artifacts required
    Lexicon,
}

/// Source location for model artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    /// Load from a local directory containing `config.json`,
    /// `tokenizer.json` and the model weights
    Local { path: PathBuf },

    /// Download from Hugging Face Hub
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

impl Default for ModelSource {
    fn default() -> Self {
        // Matches the deployment layout: model artifacts live under
        // ./models/bert_model relative to the working directory.
        Self::Local {
            path: PathBuf::from("./models/bert_model"),
        }
    }
}

fn default_revision() -> String {
    "main".to_string()
}

/// Device type for inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// CPU inference (always available)
    #[default]
    Cpu,
    /// CUDA GPU inference (if available)
    Cuda,
    /// Metal (Apple Silicon)
    Metal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment_layout() {
        let config = ClassifierConfig::default();
        assert_eq!(config.kind, ClassifierKind::Bert);
        assert_eq!(config.max_length, 200);
        match config.source {
            ModelSource::Local { path } => {
                assert_eq!(path, PathBuf::from("./models/bert_model"))
            }
            other => panic!("unexpected default source: {other:?}"),
        }
    }

    #[test]
    fn deserializes_from_yaml_fragment() {
        let yaml = r#"
kind: lexicon
device: cpu
max_length: 128
source:
  type: huggingface
  repo: someone/bert-food-ratings
"#;
        let config: ClassifierConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.kind, ClassifierKind::Lexicon);
        assert_eq!(config.max_length, 128);
        match config.source {
            ModelSource::HuggingFace { repo, revision } => {
                assert_eq!(repo, "someone/bert-food-ratings");
                assert_eq!(revision, "main");
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }
}
