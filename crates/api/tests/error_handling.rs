//! Tests for `AppError` to HTTP response mapping.
//!
//! Most cases call `IntoResponse` directly on `AppError` values. The
//! constraint cases go through the router so Postgres produces the error.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use pidmark_api::error::AppError;
use pidmark_core::error::CoreError;
use sqlx::PgPool;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Annotation",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Annotation with id 42 not found");
}

#[tokio::test]
async fn described_not_found_keeps_its_message() {
    let err = AppError::NotFound("Document 3 has no page number 7".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Document 3 has no page number 7");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("box too small".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "box too small");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("illegal status move".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "illegal status move");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    for err in [
        AppError::InternalError("secret database credentials leaked".into()),
        AppError::Core(CoreError::Internal("xml writer exploded".into())),
        AppError::Database(sqlx::Error::PoolTimedOut),
    ] {
        let (status, json) = error_to_response(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");
    }
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unique_violation_returns_409(pool: PgPool) {
    let body = serde_json::json!({"name": "Gate Valve", "category": "Valves"});
    common::post_json(common::build_test_app(pool.clone()), "/api/v1/symbols", body.clone()).await;

    let response = common::post_json(common::build_test_app(pool), "/api/v1/symbols", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = common::body_json(response).await;
    assert_eq!(
        json["error"],
        "Duplicate value violates unique constraint: uq_symbols_category_name"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_is_rejected(pool: PgPool) {
    let response = common::post_json(
        common::build_test_app(pool),
        "/api/v1/documents",
        serde_json::json!({"name": "missing filename"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
