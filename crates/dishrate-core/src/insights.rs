//! Customer insights summarizer
//!
//! Derives a narrative summary, recent snippets, and frequent-word
//! themes from a set of reviews. Pure and deterministic: the same
//! input collection always yields the same insights.

use crate::review::Review;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const KEY_POINT_LIMIT: usize = 5;
const THEME_LIMIT: usize = 5;
const SNIPPET_CHARS: usize = 100;

/// Insights derived from a collection of reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInsights {
    /// Templated sentence chosen by average rating
    pub summary: String,

    /// Snippets from the first reviews in input order
    pub key_points: Vec<String>,

    /// Most frequent words across all review text
    pub common_themes: Vec<String>,

    /// Describes the review count the insights were computed from
    pub generated_from: String,
}

/// Generate customer insights over `reviews`.
///
/// Input order is the caller's choice and determines which reviews
/// feed `key_points`; handlers pass reviews newest-first.
pub fn generate_customer_insights(reviews: &[Review]) -> CustomerInsights {
    if reviews.is_empty() {
        return CustomerInsights {
            summary: "No customer feedback available yet.".to_string(),
            key_points: Vec::new(),
            common_themes: Vec::new(),
            generated_from: "No reviews available".to_string(),
        };
    }

    let total_reviews = reviews.len();
    let avg_rating =
        reviews.iter().map(|r| r.predicted_rating).sum::<f64>() / total_reviews as f64;

    let summary = if avg_rating >= 4.0 {
        format!(
            "Customers are generally very satisfied with the food. \
             Based on {total_reviews} reviews, most customers recommend it."
        )
    } else if avg_rating >= 3.0 {
        format!(
            "Customers have mixed experiences with the food. \
             Based on {total_reviews} reviews, many customers recommend it."
        )
    } else {
        format!(
            "Customers have expressed concerns about the food. \
             Based on {total_reviews} reviews, improvements are needed."
        )
    };

    let key_points = reviews
        .iter()
        .take(KEY_POINT_LIMIT)
        .map(|r| snippet(r.text.trim()))
        .collect();

    CustomerInsights {
        summary,
        key_points,
        common_themes: common_themes(reviews),
        generated_from: format!("Analysis of {total_reviews} customer reviews"),
    }
}

/// Truncate a key-point snippet to 100 characters, marking longer text
/// with an ellipsis.
fn snippet(text: &str) -> String {
    if text.chars().count() > SNIPPET_CHARS {
        let head: String = text.chars().take(SNIPPET_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// The five most frequent lowercase words across all reviews, ties
/// broken by first-encountered order, keeping only words longer than
/// three characters. A plain histogram: no stemming, no stopwords.
fn common_themes(reviews: &[Review]) -> Vec<String> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for review in reviews {
        for word in review.text.split_whitespace() {
            let word = word.to_lowercase();
            match index.get(&word) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(word.clone(), order.len());
                    order.push((word, 1));
                }
            }
        }
    }

    // Stable sort keeps first-encounter order among equal counts.
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(THEME_LIMIT)
        .filter(|(word, _)| word.chars().count() > 3)
        .map(|(word, _)| word)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviews(specs: &[(&str, f64)]) -> Vec<Review> {
        specs
            .iter()
            .map(|(text, rating)| Review::new(*text, *rating))
            .collect()
    }

    #[test]
    fn empty_input_yields_fixed_payload() {
        let insights = generate_customer_insights(&[]);
        assert_eq!(insights.summary, "No customer feedback available yet.");
        assert!(insights.key_points.is_empty());
        assert!(insights.common_themes.is_empty());
        assert_eq!(insights.generated_from, "No reviews available");
    }

    #[test]
    fn summary_branches_on_average_thresholds() {
        let positive = generate_customer_insights(&reviews(&[("good", 4.0)]));
        assert!(positive.summary.contains("very satisfied"));

        let just_below = generate_customer_insights(&reviews(&[("ok", 3.9999)]));
        assert!(just_below.summary.contains("mixed experiences"));

        let mixed = generate_customer_insights(&reviews(&[("ok", 3.0)]));
        assert!(mixed.summary.contains("mixed experiences"));

        let negative = generate_customer_insights(&reviews(&[("bad", 2.9999)]));
        assert!(negative.summary.contains("expressed concerns"));
    }

    #[test]
    fn summary_interpolates_review_count() {
        let insights =
            generate_customer_insights(&reviews(&[("a", 5.0), ("b", 5.0), ("c", 1.0)]));
        assert!(insights.summary.contains("Based on 3 reviews"));
        assert_eq!(insights.generated_from, "Analysis of 3 customer reviews");
    }

    #[test]
    fn key_points_take_first_five_in_input_order() {
        let input = reviews(&[
            ("first", 4.0),
            ("second", 4.0),
            ("third", 4.0),
            ("fourth", 4.0),
            ("fifth", 4.0),
            ("sixth", 4.0),
        ]);
        let insights = generate_customer_insights(&input);
        assert_eq!(
            insights.key_points,
            vec!["first", "second", "third", "fourth", "fifth"]
        );
    }

    #[test]
    fn key_points_truncate_long_snippets() {
        let long = "y".repeat(150);
        let insights = generate_customer_insights(&reviews(&[(&long, 4.0)]));
        let point = &insights.key_points[0];
        assert_eq!(point.chars().count(), 100);
        assert!(point.ends_with("..."));
    }

    #[test]
    fn themes_count_frequencies_with_first_seen_tiebreak() {
        let input = reviews(&[
            ("delicious curry delicious naan", 5.0),
            ("curry curry again", 4.0),
            ("fresh naan", 4.0),
        ]);
        let insights = generate_customer_insights(&input);
        // curry x3, delicious x2, naan x2, again x1, fresh x1
        assert_eq!(
            insights.common_themes,
            vec!["curry", "delicious", "naan", "again", "fresh"]
        );
    }

    #[test]
    fn short_words_are_dropped_after_ranking() {
        // "the" ranks in the top five but is filtered for length, so
        // fewer than five themes come back.
        let input = reviews(&[("the the the wonderful spicy food was", 4.0)]);
        let insights = generate_customer_insights(&input);
        assert!(!insights.common_themes.iter().any(|w| w == "the"));
        assert!(insights.common_themes.len() < 5);
    }
}
