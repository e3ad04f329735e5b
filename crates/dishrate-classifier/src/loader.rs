//! Classifier loading
//!
//! Resolves the configured model source (local directory or Hugging
//! Face Hub) and constructs the classifier. Called once at startup;
//! any error here aborts the service.

use crate::bert::BertRatingClassifier;
use crate::classifier::RatingClassifier;
use crate::config::{ClassifierConfig, ClassifierKind, ModelSource};
use crate::lexicon::LexiconRatingClassifier;
use dishrate_core::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Load the classifier described by `config`.
pub fn load_classifier(config: &ClassifierConfig) -> Result<Arc<dyn RatingClassifier>> {
    match config.kind {
        ClassifierKind::Lexicon => {
            tracing::info!("Loading lexicon rating classifier (no model artifacts)");
            Ok(Arc::new(LexiconRatingClassifier::new()?))
        }
        ClassifierKind::Bert => {
            let model_dir = resolve_model_dir(&config.source)?;
            Ok(Arc::new(BertRatingClassifier::load(model_dir, config)?))
        }
    }
}

/// Resolve the model directory, downloading from the Hub if needed.
fn resolve_model_dir(source: &ModelSource) -> Result<PathBuf> {
    match source {
        ModelSource::Local { path } => {
            if !path.exists() {
                return Err(dishrate_core::Error::config(format!(
                    "Model path does not exist: {}",
                    path.display()
                )));
            }
            Ok(path.clone())
        }
        ModelSource::HuggingFace { repo, revision } => download_from_huggingface(repo, revision),
    }
}

/// Download model artifacts from Hugging Face Hub and return the
/// cache directory they land in.
fn download_from_huggingface(repo: &str, revision: &str) -> Result<PathBuf> {
    tracing::info!("Downloading model from HuggingFace: {repo} @ {revision}");

    let api = hf_hub::api::sync::Api::new().map_err(|e| {
        dishrate_core::Error::classifier(format!("Failed to initialize HuggingFace API: {e}"))
    })?;

    let repo_obj = api.repo(hf_hub::Repo::with_revision(
        repo.to_string(),
        hf_hub::RepoType::Model,
        revision.to_string(),
    ));

    let mut config_path = None;
    for file in ["config.json", "tokenizer.json", "model.safetensors"] {
        tracing::debug!("Downloading {file}");
        let path = repo_obj.get(file).map_err(|e| {
            dishrate_core::Error::classifier(format!("Failed to download {file}: {e}"))
        })?;
        if file == "config.json" {
            config_path = Some(path);
        }
    }

    config_path
        .and_then(|p| p.parent().map(|dir| dir.to_path_buf()))
        .ok_or_else(|| dishrate_core::Error::classifier("Invalid model cache path"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_kind_needs_no_artifacts() {
        let config = ClassifierConfig {
            kind: ClassifierKind::Lexicon,
            ..Default::default()
        };
        let classifier = load_classifier(&config).unwrap();
        assert_eq!(classifier.name(), "lexicon-rating");
    }

    #[test]
    fn missing_local_model_fails_loudly() {
        let config = ClassifierConfig {
            kind: ClassifierKind::Bert,
            source: ModelSource::Local {
                path: PathBuf::from("/nope/bert_model"),
            },
            ..Default::default()
        };
        assert!(load_classifier(&config).is_err());
    }
}
