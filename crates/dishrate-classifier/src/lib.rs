//! DishRate Classifier
//!
//! Rating inference for review text: a 5-class BERT sequence
//! classifier running on Candle, a lexicon-based fallback for
//! development and tests, and the configuration to load either one.

pub mod bert;
pub mod classifier;
pub mod config;
pub mod lexicon;
pub mod loader;

pub use bert::BertRatingClassifier;
pub use classifier::{RatingClassifier, MAX_RATING, MIN_RATING};
pub use config::{ClassifierConfig, ClassifierKind, DeviceKind, ModelSource};
pub use lexicon::LexiconRatingClassifier;
pub use loader::load_classifier;
