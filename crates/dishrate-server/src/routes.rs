//! HTTP routes and handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::AppState;
use dishrate_core::display::{
    formatted_date, friendly_timestamp, rating_display, rating_string, round2, star_display,
    text_preview,
};
use dishrate_core::review::MAX_REVIEW_CHARS;
use dishrate_core::{generate_customer_insights, text, CustomerInsights, Review};

/// Fixed page size for review listing.
const PAGE_SIZE: usize = 50;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/reviews/predict/", post(predict_review))
        .route("/reviews/", get(review_list).delete(clear_all_reviews))
        .route("/reviews/status-bar/", get(review_status_summary))
        .route("/reviews/customer-insights/", get(customer_insights))
        .fallback(fallback)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    #[serde(default)]
    review_text: String,
}

/// Enriched review returned by the predict endpoint.
#[derive(Debug, Serialize)]
struct PredictResponse {
    id: Uuid,
    review_text: String,
    cleaned_text: String,
    predicted_rating: f64,
    rating_string: String,
    stars: String,
    timestamp: String,
    friendly_timestamp: Option<String>,
    formatted_date: String,
    created_at: String,
    text: String,
    rating_display: String,
}

/// Review entry in the paginated listing.
#[derive(Debug, Serialize)]
struct ReviewItem {
    id: Uuid,
    text: String,
    text_preview: String,
    predicted_rating: f64,
    created_at: String,
    /// Kept as the full date line for frontend parity
    timestamp: String,
    friendly_timestamp: Option<String>,
    formatted_date: String,
    rating_string: String,
    stars: String,
    rating_display: String,
}

impl ReviewItem {
    fn from_review(review: &Review) -> Self {
        let ts = Some(review.created_at);
        Self {
            id: review.id,
            text: review.text.clone(),
            text_preview: text_preview(&review.text),
            predicted_rating: review.predicted_rating,
            created_at: review.created_at.to_rfc3339(),
            timestamp: formatted_date(ts),
            friendly_timestamp: friendly_timestamp(ts),
            formatted_date: formatted_date(ts),
            rating_string: rating_string(review.predicted_rating),
            stars: star_display(review.predicted_rating),
            rating_display: rating_display(review.predicted_rating),
        }
    }
}

/// Global aggregates shown alongside the listing.
#[derive(Debug, Serialize)]
struct SummaryStats {
    total_reviews: usize,
    average_rating: f64,
    star_distribution: BTreeMap<u8, u64>,
    star_distribution_percent: BTreeMap<u8, u64>,
}

#[derive(Debug, Serialize)]
struct ListResponse {
    count: usize,
    next: Option<u32>,
    previous: Option<u32>,
    results: Vec<ReviewItem>,
    customer_insights: CustomerInsights,
    summary: SummaryStats,
    status: &'static str,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u32>,
}

#[derive(Debug, Serialize)]
struct RatingGroup {
    rating: f64,
    rating_string: String,
    stars: String,
    count: u64,
}

#[derive(Debug, Serialize)]
struct StatusBarResponse {
    rating_distribution: Vec<RatingGroup>,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct InsightsResponse {
    customer_insights: CustomerInsights,
    total_reviews: usize,
    average_rating: Option<f64>,
    average_stars: Option<String>,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ClearResponse {
    message: String,
}

/// Classify a review, persist it, and return the enriched record.
async fn predict_review(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<(StatusCode, Json<PredictResponse>), AppError> {
    metrics::counter!("dishrate_requests_total").increment(1);

    let review_text = req.review_text.trim();
    if review_text.is_empty() {
        return Err(AppError::Validation("Review text is required".to_string()));
    }
    if review_text.chars().count() > MAX_REVIEW_CHARS {
        return Err(AppError::Validation(
            "Review text cannot exceed 5000 characters.".to_string(),
        ));
    }
    if text::word_count(review_text) < 2 {
        return Err(AppError::Validation(
            "Please enter at least 2 words in your review.".to_string(),
        ));
    }

    let cleaned_text = text::normalize(review_text);
    debug!("Classifying review ({} chars)", cleaned_text.len());

    let rating = state
        .classifier
        .classify(&cleaned_text)
        .await
        .map_err(|e| AppError::Inference(format!("Prediction failed: {e}")))?;
    let predicted_rating = rating as f64;

    let review = state
        .store
        .create(review_text, predicted_rating)
        .map_err(|e| AppError::Inference(format!("Prediction failed: {e}")))?;

    info!("Stored review {} with rating {}", review.id, rating);
    metrics::counter!("dishrate_predictions_total").increment(1);

    let ts = Some(review.created_at);
    Ok((
        StatusCode::CREATED,
        Json(PredictResponse {
            id: review.id,
            review_text: review_text.to_string(),
            cleaned_text,
            predicted_rating: round2(predicted_rating),
            rating_string: rating_string(predicted_rating),
            stars: star_display(predicted_rating),
            timestamp: review.created_at.to_rfc3339(),
            friendly_timestamp: friendly_timestamp(ts),
            formatted_date: formatted_date(ts),
            created_at: review.created_at.to_rfc3339(),
            text: review_text.to_string(),
            rating_display: rating_display(predicted_rating),
        }),
    ))
}

/// Paginated listing with global aggregates and insights. The
/// insights and summary cover every stored review, not just the page.
async fn review_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, AppError> {
    metrics::counter!("dishrate_requests_total").increment(1);

    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(AppError::Validation("Invalid page number.".to_string()));
    }

    let reviews = state.store.newest_first();
    let total_reviews = reviews.len();

    let start = (page as usize - 1) * PAGE_SIZE;
    let results: Vec<ReviewItem> = reviews
        .iter()
        .skip(start)
        .take(PAGE_SIZE)
        .map(ReviewItem::from_review)
        .collect();

    let next = (start + PAGE_SIZE < total_reviews).then(|| page + 1);
    let previous = (page > 1).then(|| page - 1);

    let average_rating = round2(state.store.average_rating().unwrap_or(0.0));
    let star_distribution = state.store.star_distribution();
    let star_distribution_percent = star_distribution
        .iter()
        .map(|(&star, &count)| {
            let percent = if total_reviews == 0 {
                0
            } else {
                ((count as f64 / total_reviews as f64) * 100.0).round() as u64
            };
            (star, percent)
        })
        .collect();

    Ok(Json(ListResponse {
        count: total_reviews,
        next,
        previous,
        results,
        customer_insights: generate_customer_insights(&reviews),
        summary: SummaryStats {
            total_reviews,
            average_rating,
            star_distribution,
            star_distribution_percent,
        },
        status: "success",
    }))
}

/// Per-rating counts for the status bar, ascending by rating.
async fn review_status_summary(
    State(state): State<AppState>,
) -> Result<Json<StatusBarResponse>, AppError> {
    metrics::counter!("dishrate_requests_total").increment(1);

    let rating_distribution = state
        .store
        .rating_groups()
        .into_iter()
        .map(|(rating, count)| RatingGroup {
            rating,
            rating_string: rating_string(rating),
            stars: star_display(rating),
            count,
        })
        .collect();

    Ok(Json(StatusBarResponse {
        rating_distribution,
        status: "success",
    }))
}

async fn customer_insights(
    State(state): State<AppState>,
) -> Result<Json<InsightsResponse>, AppError> {
    metrics::counter!("dishrate_requests_total").increment(1);

    let reviews = state.store.newest_first();
    let insights = generate_customer_insights(&reviews);
    let avg_rating = state.store.average_rating();

    Ok(Json(InsightsResponse {
        customer_insights: insights,
        total_reviews: reviews.len(),
        average_rating: avg_rating.map(round2),
        average_stars: avg_rating.map(star_display),
        status: "success",
    }))
}

async fn clear_all_reviews(
    State(state): State<AppState>,
) -> Result<Json<ClearResponse>, AppError> {
    metrics::counter!("dishrate_requests_total").increment(1);

    let count = state
        .store
        .clear_all()
        .map_err(|e| AppError::Storage(format!("Failed to clear reviews: {e}")))?;

    warn!("Cleared {count} reviews");
    metrics::counter!("dishrate_reviews_cleared_total").increment(count as u64);

    Ok(Json(ClearResponse {
        message: format!("Deleted {count} reviews successfully."),
    }))
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Inference(String),
    Storage(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Inference(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            AppError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": msg, "status": "error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
