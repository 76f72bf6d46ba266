use crate::api::{ApiError, AppState, PRIVACY_STATEMENT};
use crate::emotion::ClassificationResult;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const LOG_TARGET: &str = "api";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub emotion_engine: String,
    pub privacy: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    pub privacy: String,
    pub endpoints: BTreeMap<String, String>,
}

/// GET /
pub async fn root() -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("/analyze".to_owned(), "POST - Analyze text emotion".to_owned()),
        ("/health".to_owned(), "GET - Health check".to_owned()),
    ]);
    Json(ServiceInfo {
        message: "Emotion Pal API".to_owned(),
        status: "active".to_owned(),
        privacy: "All data processed locally - no storage".to_owned(),
        endpoints,
    })
}

/// GET /health
///
/// Always healthy; reports which engine was selected at startup.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_owned(),
        emotion_engine: state.classifier.engine().as_str().to_owned(),
        privacy: PRIVACY_STATEMENT.to_owned(),
    })
}

/// POST /analyze
///
/// Empty or whitespace-only text is valid and classifies as calm.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(target: LOG_TARGET, "rejected analyze body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    if let Some(max) = state.max_text_chars {
        if request.text.trim().chars().count() > max {
            return Err(ApiError::TextTooLong { max });
        }
    }

    let result = state.classifier.classify(&request.text).await;
    tracing::info!(
        target: LOG_TARGET,
        emotion = %result.emotion,
        confidence = result.confidence,
        "text analyzed"
    );
    Ok(Json(result))
}
