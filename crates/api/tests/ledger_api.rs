//! HTTP-level integration tests for the stock ledger endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, post_json_as};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_item(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/items",
        json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_location(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/locations",
        json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Applying movements
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn receipt_and_issue_round_trip(pool: PgPool) {
    let helmet = create_item(&pool, "Helmet").await;
    let main = create_location(&pool, "Main").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        json!({
            "transaction_type": "receipt",
            "item_id": helmet,
            "target_id": main,
            "quantity": 10,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["transaction_type"], "receipt");
    assert_eq!(created["data"]["quantity"], 10);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stock/at/{main}?item_id={helmet}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["quantity"], 10);

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        json!({
            "transaction_type": "issue",
            "item_id": helmet,
            "source_id": main,
            "quantity": 4,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stock/total?item_id={helmet}"),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["quantity"], 6);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insufficient_stock_reports_the_available_quantity(pool: PgPool) {
    let helmet = create_item(&pool, "Helmet").await;
    let main = create_location(&pool, "Main").await;

    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        json!({
            "transaction_type": "receipt",
            "item_id": helmet,
            "target_id": main,
            "quantity": 6,
        }),
    )
    .await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        json!({
            "transaction_type": "issue",
            "item_id": helmet,
            "source_id": main,
            "quantity": 10,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_STOCK");
    assert_eq!(json["available"], 6);
    assert_eq!(json["requested"], 10);

    // The balance is untouched.
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stock/at/{main}?item_id={helmet}"),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["quantity"], 6);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn subject_exclusivity_is_enforced(pool: PgPool) {
    let helmet = create_item(&pool, "Helmet").await;
    let main = create_location(&pool, "Main").await;

    // Both item and variant.
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        json!({
            "transaction_type": "receipt",
            "item_id": helmet,
            "variant_id": 1,
            "target_id": main,
            "quantity": 1,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    // Neither.
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        json!({
            "transaction_type": "receipt",
            "target_id": main,
            "quantity": 1,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_endpoint_and_equal_endpoints_are_rejected(pool: PgPool) {
    let helmet = create_item(&pool, "Helmet").await;
    let main = create_location(&pool, "Main").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        json!({
            "transaction_type": "transfer",
            "item_id": helmet,
            "source_id": main,
            "quantity": 1,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        json!({
            "transaction_type": "transfer",
            "item_id": helmet,
            "source_id": main,
            "target_id": main,
            "quantity": 1,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_subject_is_not_found(pool: PgPool) {
    let main = create_location(&pool, "Main").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        json!({
            "transaction_type": "receipt",
            "item_id": 999_999,
            "target_id": main,
            "quantity": 1,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn actor_header_is_recorded_on_the_transaction(pool: PgPool) {
    let member_id: (i64,) = sqlx::query_as("INSERT INTO members (name) VALUES ('Sam') RETURNING id")
        .fetch_one(&pool)
        .await
        .unwrap();
    let helmet = create_item(&pool, "Helmet").await;
    let main = create_location(&pool, "Main").await;

    let response = post_json_as(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        member_id.0,
        json!({
            "transaction_type": "receipt",
            "item_id": helmet,
            "target_id": main,
            "quantity": 2,
            "note": "yearly delivery",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["actor_id"], member_id.0);
    assert_eq!(json["data"]["note"], "yearly delivery");
}

// ---------------------------------------------------------------------------
// Reading the log and balances
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn transaction_log_is_listable_and_filterable(pool: PgPool) {
    let helmet = create_item(&pool, "Helmet").await;
    let rope = create_item(&pool, "Rope").await;
    let main = create_location(&pool, "Main").await;

    for (item, quantity) in [(helmet, 5), (rope, 2)] {
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/stock/transactions",
            json!({
                "transaction_type": "receipt",
                "item_id": item,
                "target_id": main,
                "quantity": quantity,
            }),
        )
        .await;
    }

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stock/transactions?item_id={rope}"),
    )
    .await;
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["subject_id"], rope);

    let id = rows[0]["id"].as_i64().unwrap();
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stock/transactions/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn balances_endpoints_skip_zero_rows(pool: PgPool) {
    let helmet = create_item(&pool, "Helmet").await;
    let main = create_location(&pool, "Main").await;
    let annex = create_location(&pool, "Annex").await;

    for (target, quantity) in [(main, 5), (annex, 3)] {
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/stock/transactions",
            json!({
                "transaction_type": "receipt",
                "item_id": helmet,
                "target_id": target,
                "quantity": quantity,
            }),
        )
        .await;
    }
    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/stock/transactions",
        json!({
            "transaction_type": "issue",
            "item_id": helmet,
            "source_id": annex,
            "quantity": 3,
        }),
    )
    .await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stock/balances?item_id={helmet}"),
    )
    .await;
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["location_name"], "Main");
    assert_eq!(rows[0]["quantity"], 5);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/locations/{main}/stock"),
    )
    .await;
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Helmet");
}
