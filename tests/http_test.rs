//! Requests sent through the full router: bearer authentication, the
//! administrator gate and request-body errors.
//!
//! The handlers read the process-wide connection and configuration, so every
//! test here shares one runtime and one migrated in-memory database. Each test
//! uses its own email addresses.

mod common;

use std::future::Future;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tower::ServiceExt;
use training_tracker::app::api_router;
use training_tracker::bootstrap::promote_administrator;
use training_tracker::config::APP_CONFIG;
use training_tracker::extractor::TokenClaims;
use training_tracker::static_service::{DATABASE_CONNECTION, get_database_connection};

static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build test runtime")
});

fn run<F>(test: F)
where
    F: Future<Output = ()>,
{
    RUNTIME.block_on(async {
        DATABASE_CONNECTION
            .get_or_init(|| async {
                // configuration is read once, from the environment
                unsafe {
                    std::env::set_var("DATABASE_URL", "sqlite::memory:");
                    std::env::set_var("JWT_SECRET", "http-test-secret");
                }
                common::setup_db().await
            })
            .await;

        test.await
    });
}

fn token_for(email: &str, secret: &str) -> String {
    let claims = TokenClaims {
        sub: format!("idp|{email}"),
        email: Some(email.to_string()),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn signed_token(email: &str) -> String {
    token_for(email, &APP_CONFIG.jwt_secret)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = api_router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[test]
fn test_missing_bearer_is_unauthorized() {
    run(async {
        let (status, body) = send(get("/api/v1/public/catalog", None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    });
}

#[test]
fn test_invalid_bearer_is_unauthorized() {
    run(async {
        let forged = token_for("mallory@example.com", "not-the-shared-secret");
        let (status, _) = send(get("/api/v1/public/me/progress", Some(&forged))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(get("/api/v1/public/catalog", Some("garbage"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    });
}

#[test]
fn test_login_email_must_match_the_token() {
    run(async {
        let token = signed_token("maria.http@example.com");
        let body = json!({ "email": "someone.else@example.com" });

        let (status, body) = send(post("/api/v1/public/login-email", &token, body)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["error"].is_string());
    });
}

#[test]
fn test_login_email_resolves_the_caller() {
    run(async {
        let token = signed_token("joana.http@example.com");
        let body = json!({ "email": "  Joana.Http@Example.com ", "name": "Joana" });

        let (status, body) = send(post("/api/v1/public/login-email", &token, body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "joana.http@example.com");
        assert_eq!(body["name"], "Joana");
        assert_eq!(body["administrator"], false);
    });
}

#[test]
fn test_catalog_writes_need_an_administrator() {
    run(async {
        let token = signed_token("carla.http@example.com");
        let body = json!({ "name": "Gated Department" });

        let (status, _) = send(post("/api/v1/departments", &token, body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, listed) = send(get("/api/v1/departments", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(listed.as_array().is_some());
    });
}

#[test]
fn test_administrator_creates_a_department() {
    run(async {
        promote_administrator(get_database_connection(), "admin.http@example.com")
            .await
            .unwrap();
        let token = signed_token("admin.http@example.com");
        let body = json!({ "name": "Payroll Department" });

        let (status, body) = send(post("/api/v1/departments", &token, body)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Payroll Department");
    });
}

#[test]
fn test_malformed_bodies_are_validation_errors() {
    run(async {
        let token = signed_token("body.http@example.com");

        let (status, body) = send(post("/api/v1/public/start-training", &token, json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "body");
        assert!(body["error"].as_str().unwrap().contains("training_id"));

        let wrong_type = json!({ "module_id": "first", "completed": true });
        let (status, body) = send(post("/api/v1/public/complete-module", &token, wrong_type)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "body");
        assert!(body["error"].is_string());
    });
}

#[test]
fn test_unknown_training_is_not_found_through_the_router() {
    run(async {
        let token = signed_token("lost.http@example.com");
        let body = json!({ "training_id": 987_654 });

        let (status, body) = send(post("/api/v1/public/start-training", &token, body)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["resource"], "Training");
    });
}
