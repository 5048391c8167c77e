#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use recipebox::config::ServerConfig;
use recipebox::db::migrations::Migrator;
use recipebox::storage::MediaStore;
use recipebox::web;

/// A payload that passes the image sniffer; only the magic number matters.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake image data";

pub struct TestApp {
    pub router: Router,
    /// Keeps the media directory alive for the duration of the test.
    pub media_root: TempDir,
}

impl TestApp {
    pub fn media_path(&self, relative: &str) -> std::path::PathBuf {
        self.media_root.path().join(relative)
    }
}

/// Fresh in-memory SQLite database with migrations applied, wired into the
/// real router.
pub async fn spawn_app() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    let media_root = tempfile::tempdir().expect("Failed to create media dir");
    let config = Arc::new(ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        media_root: media_root.path().to_path_buf(),
    });
    let media = MediaStore::new(media_root.path());
    let router = web::create_axum_router(db, media, config);

    TestApp { router, media_root }
}

pub async fn request_json(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn register_user(app: &TestApp, email: &str, password: &str, name: &str) -> Value {
    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/users",
        None,
        Some(json!({ "email": email, "password": password, "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/users/token",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

pub async fn register_and_login(app: &TestApp, email: &str, password: &str, name: &str) -> String {
    register_user(app, email, password, name).await;
    login(app, email, password).await
}

/// Sends `bytes` as the `image` field of a multipart upload.
pub async fn upload_image(
    router: &Router,
    uri: &str,
    token: &str,
    bytes: &[u8],
) -> (StatusCode, Value) {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"image\"; filename=\"upload.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
