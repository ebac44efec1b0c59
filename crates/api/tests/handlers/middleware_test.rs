use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::IntoResponse,
};
use bookit_api::{
    ApiState, app,
    config::ApiConfig,
    middleware::{
        auth::{bearer_token, verify_admin},
        error_handling::{map_error, timeout_error_body},
    },
};
use bookit_core::errors::BookitError;
use bookit_db::{MemoryStore, store::MockStore};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::test_utils::{ADMIN_KEY, TestContext, bearer, server_for};

#[rstest]
#[case::not_found(BookitError::NotFound("Experience not found".into()), StatusCode::NOT_FOUND)]
#[case::validation(BookitError::Validation("Missing required fields".into()), StatusCode::BAD_REQUEST)]
#[case::conflict(BookitError::Conflict("Slot already booked".into()), StatusCode::CONFLICT)]
#[case::authentication(BookitError::Authentication("Missing bearer token".into()), StatusCode::UNAUTHORIZED)]
#[case::database(BookitError::Database(eyre::eyre!("connection refused")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: BookitError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[test]
fn test_internal_error_maps_to_500() {
    let error = BookitError::Internal(Box::new(std::io::Error::other("disk full")));

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_storage_failure_returns_generic_500() {
    let mut store = MockStore::new();
    store
        .expect_list_experiences()
        .returning(|_| Err(BookitError::Database(eyre::eyre!("password authentication failed"))));
    let server = server_for(Arc::new(store), None);

    let response = server.get("/experiences").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn test_booking_is_not_attempted_for_invalid_request() {
    // No expectations: any store call would panic the mock.
    let server = server_for(Arc::new(MockStore::new()), None);

    let response = server
        .post("/bookings")
        .json(&json!({ "experienceId": "not-a-uuid", "userName": "A", "userEmail": "a@b.c",
                       "userPhone": "1", "selectedDate": "2025-06-01", "selectedTime": "09:00",
                       "numberOfGuests": 1 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/promo/validate")
        .content_type("application/json")
        .bytes("{ not json".into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_timeout_gets_error_body() {
    let response = timeout_error_body(StatusCode::REQUEST_TIMEOUT.into_response()).await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "Request timed out" }));
}

#[tokio::test]
async fn test_other_responses_pass_through_timeout_mapping() {
    let response = timeout_error_body((StatusCode::CREATED, "made").into_response()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"made");
}

#[rstest]
#[case::standard("Bearer abc", Some("abc"))]
#[case::lowercase_scheme("bearer abc", Some("abc"))]
#[case::extra_spaces("  Bearer   abc  ", Some("abc"))]
#[case::basic_scheme("Basic abc", None)]
#[case::no_token("Bearer ", None)]
#[case::no_scheme("abc", None)]
fn test_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
    assert_eq!(bearer_token(header), expected);
}

#[test]
fn test_verify_admin() {
    assert!(verify_admin(None, None).is_ok());
    assert!(verify_admin(None, Some("Bearer anything")).is_ok());
    assert!(verify_admin(Some("key"), Some("Bearer key")).is_ok());

    assert!(matches!(
        verify_admin(Some("key"), None),
        Err(BookitError::Authentication(_))
    ));
    assert!(matches!(
        verify_admin(Some("key"), Some("Bearer wrong")),
        Err(BookitError::Authentication(_))
    ));
}

#[tokio::test]
async fn test_wrong_admin_key_is_unauthorized() {
    let ctx = TestContext::with_admin_key(Some(ADMIN_KEY));
    let (name, value) = bearer("not-the-key");

    let response = ctx.server.get("/bookings").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Invalid admin credentials" }));
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    let health: Value = ctx.server.get("/health").await.json();
    assert_eq!(health, json!({ "status": "ok" }));

    let version: Value = ctx.server.get("/version").await.json();
    assert_eq!(version["version"], json!(env!("CARGO_PKG_VERSION")));
}

fn config_from(pairs: &[(&str, &str)]) -> eyre::Result<ApiConfig> {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ApiConfig::from_lookup(move |key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
}

#[test]
fn test_config_defaults() {
    let config = config_from(&[("DATABASE_URL", "postgres://localhost/bookit")]).unwrap();

    assert_eq!(config.server_addr(), "0.0.0.0:5000");
    assert_eq!(config.storage, bookit_api::config::StorageBackend::Postgres);
    assert_eq!(config.log_level, tracing::Level::INFO);
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.cors_origins, None);
    assert_eq!(config.admin_api_key, None);
    assert!(!config.seed_data);
}

#[test]
fn test_config_overrides() {
    let config = config_from(&[
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("STORAGE_BACKEND", "memory"),
        ("LOG_LEVEL", "DEBUG"),
        ("API_CORS_ORIGINS", "http://localhost:5173, https://bookit.example"),
        ("API_REQUEST_TIMEOUT_SECONDS", "5"),
        ("ADMIN_API_KEY", "secret"),
        ("SEED_DATA", "true"),
    ])
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.storage, bookit_api::config::StorageBackend::Memory);
    assert_eq!(config.database_url, None);
    assert_eq!(config.log_level, tracing::Level::DEBUG);
    assert_eq!(
        config.cors_origins,
        Some(vec![
            "http://localhost:5173".to_string(),
            "https://bookit.example".to_string()
        ])
    );
    assert_eq!(config.request_timeout, 5);
    assert_eq!(config.admin_api_key.as_deref(), Some("secret"));
    assert!(config.seed_data);
}

#[rstest]
#[case::postgres_without_url(&[])]
#[case::bad_port(&[("DATABASE_URL", "postgres://x"), ("API_PORT", "eighty")])]
#[case::unknown_backend(&[("STORAGE_BACKEND", "mongo")])]
fn test_config_errors(#[case] pairs: &[(&str, &str)]) {
    assert!(config_from(pairs).is_err());
}

#[tokio::test]
async fn test_app_answers_cors_preflight() {
    let config = config_from(&[
        ("STORAGE_BACKEND", "memory"),
        ("API_CORS_ORIGINS", "http://localhost:5173"),
    ])
    .unwrap();
    let state = Arc::new(ApiState::new(Arc::new(MemoryStore::new()), None));

    let response = app(&config, state)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/experiences")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
}
