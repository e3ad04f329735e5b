//! DishRate Core
//!
//! Core types and pure functions shared across DishRate components.
//!
//! This crate provides:
//! - The `Review` domain type
//! - Error types and result handling
//! - Text normalization utilities used ahead of classification
//! - Display formatters (stars, rating strings, review dates)
//! - The customer insights summarizer

pub mod display;
pub mod error;
pub mod insights;
pub mod review;
pub mod text;

pub use error::{Error, Result};
pub use insights::{generate_customer_insights, CustomerInsights};
pub use review::Review;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::insights::{generate_customer_insights, CustomerInsights};
    pub use crate::review::Review;
}
