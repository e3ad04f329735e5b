//! Shared application state

use crate::store::ReviewStore;
use dishrate_classifier::RatingClassifier;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// State shared across request handlers.
///
/// The classifier and store are read-mostly and safe for concurrent
/// use; cloning the state is cheap.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn RatingClassifier>,
    pub store: Arc<ReviewStore>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        classifier: Arc<dyn RatingClassifier>,
        store: Arc<ReviewStore>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            classifier,
            store,
            metrics,
        }
    }
}
