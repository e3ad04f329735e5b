//! Rating classifier trait

use async_trait::async_trait;
use dishrate_core::Result;

/// Lowest rating a classifier may return.
pub const MIN_RATING: u8 = 1;

/// Highest rating a classifier may return.
pub const MAX_RATING: u8 = 5;

/// Trait for rating classifiers.
///
/// Implementations are stateless per call and safe for concurrent
/// use: the service holds one instance behind an `Arc` for the
/// process lifetime.
#[async_trait]
pub trait RatingClassifier: Send + Sync {
    /// Classify normalized review text into a rating in 1..=5.
    async fn classify(&self, text: &str) -> Result<u8>;

    /// Get the classifier name
    fn name(&self) -> &str;
}
