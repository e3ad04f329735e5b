//! Lightweight lexicon rating classifier (fallback)
//!
//! Used when no model checkpoint is available (`kind: lexicon` in the
//! classifier config) and by the server test suite. Maps the ratio of
//! positive to negative lexicon hits onto a rating 1..=5.

use crate::classifier::RatingClassifier;
use aho_corasick::AhoCorasick;
use dishrate_core::Result;

pub struct LexiconRatingClassifier {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconRatingClassifier {
    pub fn new() -> Result<Self> {
        Self::with_name("lexicon-rating")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let positive = vec![
            "good",
            "great",
            "excellent",
            "love",
            "amazing",
            "delicious",
            "tasty",
            "fresh",
            "wonderful",
            "fantastic",
            "perfect",
            "best",
        ];
        let negative = vec![
            "bad",
            "terrible",
            "awful",
            "hate",
            "horrible",
            "worst",
            "bland",
            "stale",
            "cold",
            "soggy",
            "disappointed",
            "poor",
        ];

        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(positive)
            .map_err(|e| {
                dishrate_core::Error::classifier(format!(
                    "Failed to build positive lexicon matcher: {e}"
                ))
            })?;

        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(negative)
            .map_err(|e| {
                dishrate_core::Error::classifier(format!(
                    "Failed to build negative lexicon matcher: {e}"
                ))
            })?;

        Ok(Self {
            name: name.into(),
            positive,
            negative,
        })
    }
}

#[async_trait::async_trait]
impl RatingClassifier for LexiconRatingClassifier {
    async fn classify(&self, text: &str) -> Result<u8> {
        let positive_hits = self.positive.find_iter(text).count() as f64;
        let negative_hits = self.negative.find_iter(text).count() as f64;
        let total = positive_hits + negative_hits;

        if total == 0.0 {
            // No signal either way reads as neutral.
            return Ok(3);
        }

        let ratio = positive_hits / total;
        Ok(1 + (ratio * 4.0).round() as u8)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
