#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use pidmark_api::config::ServerConfig;
use pidmark_api::router::build_app_router;
use pidmark_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        public_base_url: "http://files.test".to_string(),
        db_max_connections: 5,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register a document with one 1600x1200 page; returns `(document_id, page_id)`.
pub async fn seed_document_with_page(pool: &PgPool) -> (i64, i64) {
    let resp = post_json(
        build_test_app(pool.clone()),
        "/api/v1/documents",
        serde_json::json!({"filename": "unit-100.pdf"}),
    )
    .await;
    let doc_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/documents/{doc_id}/pages"),
        serde_json::json!({"page_number": 1, "width": 1600, "height": 1200}),
    )
    .await;
    let page_id = body_json(resp).await["data"]["id"].as_i64().unwrap();
    (doc_id, page_id)
}

/// Create a manual annotation on a page; returns its id.
pub async fn seed_annotation(pool: &PgPool, page_id: i64, x: f64) -> i64 {
    let resp = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/pages/{page_id}/annotations"),
        serde_json::json!({"x": x, "y": 100.0, "width": 50.0, "height": 40.0}),
    )
    .await;
    body_json(resp).await["data"]["id"].as_i64().unwrap()
}
