//! Security Test Suite
//!
//! Validates the hardening of the annotation service: response headers,
//! input validation, and error responses that do not leak internals.

use std::net::SocketAddr;

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use geochron::utils::validation::{validate_text, ValidationError, MAX_TEXT_LENGTH};
use geochron::web::server::{create_router, create_safe_error_response};
use geochron::{AnnotationEngine, IntervalCatalog};

fn app() -> Router {
    let engine = AnnotationEngine::new(IntervalCatalog::load_embedded().unwrap()).unwrap();
    create_router(engine).unwrap()
}

fn with_peer(mut request: Request<Body>) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40001))));
    request
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Test that security headers are set on every response
#[tokio::test]
async fn test_security_headers() {
    let request = with_peer(Request::builder().uri("/").body(Body::empty()).unwrap());
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(
        headers["referrer-policy"],
        "strict-origin-when-cross-origin"
    );
}

/// Test that security headers survive on error responses
#[tokio::test]
async fn test_security_headers_on_errors() {
    let request = with_peer(
        Request::builder()
            .uri("/does-not-exist")
            .body(Body::empty())
            .unwrap(),
    );
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

/// Test that null bytes in JSON text are rejected
#[tokio::test]
async fn test_null_byte_rejected_in_body() {
    let request = with_peer(
        Request::builder()
            .method("POST")
            .uri("/api/annotate")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text": "Jurassic\u0000Holocene"}"#))
            .unwrap(),
    );
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "invalid_text");
    assert!(json["details"].is_null());
}

/// Test that null bytes in the path are rejected
#[tokio::test]
async fn test_null_byte_rejected_in_path() {
    let request = with_peer(
        Request::builder()
            .uri("/chrono/Jurassic%00Holocene")
            .body(Body::empty())
            .unwrap(),
    );
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Test that markup in the input is returned as data, never interpreted
#[tokio::test]
async fn test_markup_passes_through_as_text() {
    let request = with_peer(
        Request::builder()
            .method("POST")
            .uri("/api/annotate")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({"text": "<script>alert(1)</script> Jurassic"}).to_string(),
            ))
            .unwrap(),
    );
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/json"));

    let json = body_json(response).await;
    let entities = json["entities"].as_array().unwrap();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0]["name"], "Jurassic");
}

/// Test that requests without a JSON content type are refused
#[tokio::test]
async fn test_wrong_content_type_rejected() {
    let request = with_peer(
        Request::builder()
            .method("POST")
            .uri("/api/annotate")
            .header("content-type", "text/plain")
            .body(Body::from("Jurassic"))
            .unwrap(),
    );
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

/// Test that error messages are sanitized
#[test]
fn test_error_sanitization() {
    let error = create_safe_error_response(
        "text_too_large",
        "Text exceeds the maximum accepted length",
        Some("Text too long: 2000000 bytes exceeds 1048576"),
    );

    assert_eq!(error.error, "Text exceeds the maximum accepted length");
    assert_eq!(error.error_type, "text_too_large");
    assert!(error.details.is_none(), "Internal details must not be exposed");
}

/// Test text validation edge cases
#[test]
fn test_validation_error_handling() {
    assert_eq!(validate_text(""), Ok(""));
    assert_eq!(validate_text("Jurassic"), Ok("Jurassic"));
    assert_eq!(validate_text("a\0b"), Err(ValidationError::NullByte));

    let too_long = "x".repeat(MAX_TEXT_LENGTH + 1);
    assert_eq!(
        validate_text(&too_long),
        Err(ValidationError::TextTooLong(MAX_TEXT_LENGTH + 1))
    );

    // Multi-byte characters count by bytes
    let multibyte = "é".repeat(MAX_TEXT_LENGTH / 2 + 1);
    assert!(matches!(
        validate_text(&multibyte),
        Err(ValidationError::TextTooLong(_))
    ));
}

/// Test that the rate limiter configuration is accepted
#[test]
fn test_rate_limiting_configuration() {
    let engine = AnnotationEngine::new(IntervalCatalog::load_embedded().unwrap()).unwrap();
    assert!(create_router(engine).is_ok());
}
