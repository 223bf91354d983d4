//! Integration tests for page annotation endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_manual_annotation_defaults(pool: PgPool) {
    let (_, page_id) = common::seed_document_with_page(&pool).await;

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/pages/{page_id}/annotations"),
        json!({"x": 100.5, "y": 200.0, "width": 50.0, "height": 40.0, "tag_id": " FV-201 "}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["page_id"], page_id);
    assert_eq!(json["data"]["x"], 100.5);
    assert_eq!(json["data"]["source"], "manual");
    assert!(json["data"]["confidence"].is_null());
    assert_eq!(json["data"]["tag_id"], "FV-201");
    assert_eq!(json["data"]["attributes"], json!({}));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_detected_annotation_keeps_confidence(pool: PgPool) {
    let (_, page_id) = common::seed_document_with_page(&pool).await;

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/pages/{page_id}/annotations"),
        json!({
            "x": 10.0, "y": 10.0, "width": 20.0, "height": 20.0,
            "source": "yolo", "confidence": 0.91,
            "attributes": {"size": "4in"}
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["source"], "yolo");
    assert_eq!(json["data"]["confidence"], 0.91);
    assert_eq!(json["data"]["attributes"]["size"], "4in");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_invalid_boxes_and_sources(pool: PgPool) {
    let (_, page_id) = common::seed_document_with_page(&pool).await;
    let uri = format!("/api/v1/pages/{page_id}/annotations");

    let cases = [
        // runs off the right edge of a 1600px page
        json!({"x": 1590.0, "y": 0.0, "width": 50.0, "height": 40.0}),
        json!({"x": -1.0, "y": 0.0, "width": 50.0, "height": 40.0}),
        json!({"x": 0.0, "y": 0.0, "width": 0.0, "height": 40.0}),
        json!({"x": 0.0, "y": 0.0, "width": 5.0, "height": 5.0, "source": "yolo"}),
        json!({"x": 0.0, "y": 0.0, "width": 5.0, "height": 5.0, "confidence": 0.5}),
        json!({"x": 0.0, "y": 0.0, "width": 5.0, "height": 5.0, "source": "sam"}),
        json!({"x": 0.0, "y": 0.0, "width": 5.0, "height": 5.0, "attributes": [1, 2]}),
    ];
    for body in cases {
        let response = post_json(build_test_app(pool.clone()), &uri, body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_on_missing_page_or_symbol_returns_404(pool: PgPool) {
    let (_, page_id) = common::seed_document_with_page(&pool).await;
    let body = json!({"x": 0.0, "y": 0.0, "width": 5.0, "height": 5.0});

    let response = post_json(build_test_app(pool.clone()), "/api/v1/pages/9999/annotations", body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/pages/{page_id}/annotations"),
        json!({"symbol_id": 9999, "x": 0.0, "y": 0.0, "width": 5.0, "height": 5.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Symbol with id 9999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_in_creation_order(pool: PgPool) {
    let (_, page_id) = common::seed_document_with_page(&pool).await;
    let first = common::seed_annotation(&pool, page_id, 300.0).await;
    let second = common::seed_annotation(&pool, page_id, 100.0).await;

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/pages/{page_id}/annotations"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_merges_box(pool: PgPool) {
    let (_, page_id) = common::seed_document_with_page(&pool).await;
    let id = common::seed_annotation(&pool, page_id, 100.0).await;
    let uri = format!("/api/v1/annotations/{id}");

    let response = put_json(build_test_app(pool.clone()), &uri, json!({"x": 500.0})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["x"], 500.0);
    assert_eq!(json["data"]["y"], 100.0);
    assert_eq!(json["data"]["width"], 50.0);

    // x=1580 with the stored width of 50 leaves the page.
    let response = put_json(build_test_app(pool.clone()), &uri, json!({"x": 1580.0})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        build_test_app(pool),
        &uri,
        json!({"tag_id": "PV-3", "attributes": {"service": "steam"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["tag_id"], "PV-3");
    assert_eq!(json["data"]["x"], 500.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_annotation_returns_404(pool: PgPool) {
    let response = put_json(
        build_test_app(pool),
        "/api/v1/annotations/9999",
        json!({"tag_id": "X-1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_annotation_removes_its_connections(pool: PgPool) {
    let (_, page_id) = common::seed_document_with_page(&pool).await;
    let a = common::seed_annotation(&pool, page_id, 100.0).await;
    let b = common::seed_annotation(&pool, page_id, 400.0).await;
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/pages/{page_id}/connections"),
        json!({"from_annotation_id": a, "to_annotation_id": b}),
    )
    .await;

    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/annotations/{a}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/pages/{page_id}/connections"),
    )
    .await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());

    let response = get(build_test_app(pool), &format!("/api/v1/annotations/{a}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn explicit_null_unassigns_symbol_and_tag(pool: PgPool) {
    let (_, page_id) = common::seed_document_with_page(&pool).await;
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/symbols",
        json!({"name": "Gate Valve", "category": "Valves"}),
    )
    .await;
    let symbol_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/pages/{page_id}/annotations"),
        json!({
            "symbol_id": symbol_id, "tag_id": "XV-7",
            "x": 10.0, "y": 10.0, "width": 30.0, "height": 30.0
        }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/annotations/{id}");

    // Absent fields are untouched.
    let response = put_json(build_test_app(pool.clone()), &uri, json!({"x": 20.0})).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["symbol_id"], symbol_id);
    assert_eq!(json["data"]["tag_id"], "XV-7");

    let response = put_json(
        build_test_app(pool.clone()),
        &uri,
        json!({"symbol_id": null, "tag_id": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["symbol_id"].is_null());
    assert!(json["data"]["tag_id"].is_null());
    assert_eq!(json["data"]["x"], 20.0);

    let response = get(build_test_app(pool), &uri).await;
    assert!(body_json(response).await["data"]["symbol_id"].is_null());
}
