//! Test utilities for integration tests
#![allow(dead_code)]

use std::env;
use std::fs;
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::Request;
use tower::util::ServiceExt;

use hookbin::api::AppState;
use hookbin::api::app;
use hookbin::api::public::webhooks::Webhook;
use hookbin::core::AppConfig;
use hookbin::core::db::{async_db, initialize_db};

/// Creates a test application router backed by a throwaway SQLite
/// database in a uniquely named temp directory.
pub async fn test_app() -> Router {
    let (app, _db) = test_app_with_db().await;
    app
}

/// Same as [`test_app`], but also hands back the database connection
/// for tests that need to seed rows directly.
pub async fn test_app_with_db() -> (Router, tokio_rusqlite::Connection) {
    let dir = env::temp_dir().join(format!("hookbin-test-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("Failed to create test directory");

    let db_path = dir.join("hookbin.db");
    let db = async_db(db_path.to_str().unwrap())
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to migrate db");
        Ok(())
    })
    .await
    .unwrap();

    let app_config = AppConfig {
        storage_path: dir.display().to_string(),
        db_path: db_path.display().to_string(),
        base_url: String::from("http://localhost:2222"),
        admin_user: String::from("admin"),
        admin_password: String::from("supersecret"),
        payloads_per_page: 20,
        vapid_key_path: None,
    };
    let app_state = AppState::new(db.clone(), app_config);
    (app(Arc::new(RwLock::new(app_state))), db)
}

/// Authorization header value matching the test app's credentials.
pub fn basic_auth() -> String {
    format!("Basic {}", STANDARD.encode("admin:supersecret"))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body was not utf-8")
}

/// Create a webhook through the API and return its record.
pub async fn create_webhook(app: &Router) -> Webhook {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/webhooks")
                .method("POST")
                .header("authorization", basic_auth())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), http::StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    serde_json::from_str(&body).expect("Failed to parse webhook from response")
}

/// Post a JSON payload to a webhook's public ingest endpoint.
pub async fn post_payload(
    app: &Router,
    webhook_id: &str,
    payload: serde_json::Value,
) -> http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(format!("/webhook/{}", webhook_id))
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}
