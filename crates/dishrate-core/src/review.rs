//! The `Review` domain type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted review length in characters, after trimming.
pub const MAX_REVIEW_CHARS: usize = 5000;

/// A persisted food review with its predicted rating.
///
/// Reviews are append-only: `text` and `predicted_rating` are set
/// together at creation and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    /// Original user-submitted text (trimmed)
    pub text: String,

    /// Predicted rating in [1.0, 5.0]; integer-valued in practice
    pub predicted_rating: f64,

    /// Creation timestamp, used for newest-first ordering
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Create a new review stamped with the current time.
    pub fn new(text: impl Into<String>, predicted_rating: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            predicted_rating,
            created_at: Utc::now(),
        }
    }
}
