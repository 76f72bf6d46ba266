//! Integration tests for the HTTP API
//!
//! Tests cover:
//! - POST /analyze classification, default label, and request validation
//! - GET /health engine reporting
//! - GET / service index
//! - CORS headers for cross-origin frontends

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use emotion_pal_core::api::{build_router, AppState};
use emotion_pal_core::emotion::{Classifier, Lexicon};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

const MIN_CONFIDENCE: f64 = 0.1;

fn lexicon_app() -> Router {
    let lexicon = Lexicon::builtin().expect("builtin lexicon");
    build_router(AppState::new(Classifier::lexicon(lexicon, MIN_CONFIDENCE), None))
}

fn keyword_app() -> Router {
    build_router(AppState::new(Classifier::keyword(MIN_CONFIDENCE), None))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, body)
}

fn assert_analyze_shape(body: &Value) {
    let labels = ["happy", "sad", "angry", "fear", "surprise", "calm"];
    let emotion = body["emotion"].as_str().expect("emotion is a string");
    assert!(labels.contains(&emotion), "unexpected label {emotion}");

    let confidence = body["confidence"].as_f64().expect("confidence is a number");
    assert!((0.0..=1.0).contains(&confidence));

    let all = body["all_emotions"].as_object().expect("all_emotions is an object");
    assert_eq!(all.len(), labels.len());
    for label in labels {
        let score = all[label].as_f64().expect("score is a number");
        assert!((0.0..=1.0).contains(&score));
    }
}

// =============================================================================
// POST /analyze
// =============================================================================

#[tokio::test]
async fn analyze_happy_text() {
    let (status, body) = send(
        lexicon_app(),
        post_json("/analyze", r#"{"text": "I am feeling great today!"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_analyze_shape(&body);
    assert_eq!(body["emotion"], "happy");
    assert!(body["confidence"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn analyze_angry_text() {
    let (status, body) = send(
        lexicon_app(),
        post_json("/analyze", r#"{"text": "I hate everything right now"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "angry");
    assert!(body["confidence"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn analyze_empty_text_defaults_to_calm() {
    for text in ["", "   "] {
        let body = format!(r#"{{"text": "{text}"}}"#);
        let (status, body) = send(lexicon_app(), post_json("/analyze", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_analyze_shape(&body);
        assert_eq!(body["emotion"], "calm");
        assert_eq!(body["confidence"], 0.0);
    }
}

#[tokio::test]
async fn keyword_engine_keeps_response_shape() {
    let request = r#"{"text": "Wow, I am so shocked and a bit scared"}"#;
    let (lexicon_status, lexicon_body) = send(lexicon_app(), post_json("/analyze", request)).await;
    let (keyword_status, keyword_body) = send(keyword_app(), post_json("/analyze", request)).await;

    assert_eq!(lexicon_status, StatusCode::OK);
    assert_eq!(keyword_status, StatusCode::OK);
    assert_analyze_shape(&lexicon_body);
    assert_analyze_shape(&keyword_body);
    assert_eq!(keyword_body["emotion"], "surprise");
}

#[tokio::test]
async fn analyze_rejects_malformed_json() {
    let (status, body) = send(lexicon_app(), post_json("/analyze", r#"{"text": "#)).await;

    assert!(status.is_client_error());
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn analyze_rejects_missing_text_field() {
    let (status, body) = send(lexicon_app(), post_json("/analyze", r#"{"message": "hi"}"#)).await;

    assert!(status.is_client_error());
    assert!(body["detail"].as_str().unwrap().contains("text"));
}

#[tokio::test]
async fn analyze_rejects_missing_content_type() {
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .body(Body::from(r#"{"text": "hello"}"#))
        .unwrap();
    let (status, body) = send(lexicon_app(), request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn analyze_enforces_configured_length_limit() {
    let app = build_router(AppState::new(Classifier::keyword(MIN_CONFIDENCE), Some(10)));
    let (status, body) = send(
        app.clone(),
        post_json("/analyze", r#"{"text": "this sentence is far too long"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Text too long (max 10 characters)");

    let (status, _) = send(app, post_json("/analyze", r#"{"text": "  so happy  "}"#)).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// GET /health, GET /
// =============================================================================

#[tokio::test]
async fn health_reports_lexicon_engine() {
    let (status, body) = send(lexicon_app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["emotion_engine"], "lexicon");
    assert!(body["privacy"].is_string());
}

#[tokio::test]
async fn health_stays_healthy_on_keyword_engine() {
    let (status, body) = send(keyword_app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["emotion_engine"], "keyword-based");
}

#[tokio::test]
async fn root_lists_endpoints() {
    let (status, body) = send(lexicon_app(), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert!(body["endpoints"]["/analyze"].is_string());
    assert!(body["endpoints"]["/health"].is_string());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/analyze")
        .header(header::ORIGIN, "https://frontend.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = lexicon_app().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
