//! HTTP API: `/analyze`, `/health` and the service index at `/`.

mod error;
mod handlers;

use crate::emotion::Classifier;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;
pub use handlers::{analyze, health, root, AnalyzeRequest, HealthResponse, ServiceInfo};

/// Privacy disclosure reported by `/health`.
pub const PRIVACY_STATEMENT: &str = "No data storage - fully local processing";

/// Shared handler state. The classifier is built once at startup and never
/// mutated afterwards.
#[derive(Clone, Debug)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    /// Longest accepted text in characters; `None` accepts any length.
    pub max_text_chars: Option<usize>,
}

impl AppState {
    pub fn new(classifier: Classifier, max_text_chars: Option<usize>) -> Self {
        Self {
            classifier: Arc::new(classifier),
            max_text_chars,
        }
    }
}

/// Builds the router with permissive CORS so a frontend on another origin
/// can call it.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
