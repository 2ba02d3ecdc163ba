mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use rust_decimal::Decimal;
use tower::ServiceExt;

use common::{build_test_app, sample_output, seed_product, FakeEngine};
use pricepilot::engine::EngineError;

fn optimize_request(product_id: i64, competitor_price: f64, season: &str) -> Request<Body> {
    let body = serde_json::json!({
        "productId": product_id,
        "parameters": { "competitor_price": competitor_price, "season": season },
    });
    Request::builder()
        .method("POST")
        .uri("/api/optimize-price")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn optimize_returns_result_with_snapshot_price() {
    // The fake engine echoes a bogus current_price; the stored snapshot must
    // be the product's price at submission, not what the engine claims.
    let mut output = sample_output();
    output.current_price = Decimal::new(9999, 2);

    let (app, pool) = build_test_app(Arc::new(FakeEngine::ok(output))).await;
    seed_product(&pool, 9001, Decimal::new(1999, 2), Decimal::new(800, 2)).await;

    let resp = app.oneshot(optimize_request(9001, 18.50, "promotion")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["current_price"], "19.99");
    assert_eq!(json["data"]["optimal_price"], "17.99");
    assert!(json["data"]["applied_at"].is_null());

    let stored: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM optimization_results WHERE product_id = $1")
            .bind(9001i64)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn unknown_season_is_rejected_with_422() {
    let (app, pool) = build_test_app(Arc::new(FakeEngine::ok(sample_output()))).await;
    seed_product(&pool, 9002, Decimal::new(1999, 2), Decimal::new(800, 2)).await;

    let resp = app.oneshot(optimize_request(9002, 18.50, "monsoon")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = json_body(resp).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn negative_competitor_price_is_rejected_with_422() {
    let (app, pool) = build_test_app(Arc::new(FakeEngine::ok(sample_output()))).await;
    seed_product(&pool, 9003, Decimal::new(1999, 2), Decimal::new(800, 2)).await;

    let resp = app.oneshot(optimize_request(9003, -1.0, "regular")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_product_is_404() {
    let (app, _pool) = build_test_app(Arc::new(FakeEngine::ok(sample_output()))).await;

    let resp = app.oneshot(optimize_request(999_999, 18.50, "regular")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_optimize_calls_conflict_on_the_lock() {
    let engine = FakeEngine::ok_with_delay(sample_output(), Duration::from_millis(500));
    let (app, pool) = build_test_app(Arc::new(engine)).await;
    seed_product(&pool, 9004, Decimal::new(1999, 2), Decimal::new(800, 2)).await;

    let (first, second) = tokio::join!(
        app.clone().oneshot(optimize_request(9004, 18.50, "regular")),
        app.clone().oneshot(optimize_request(9004, 18.50, "regular")),
    );

    let statuses = [first.unwrap().status(), second.unwrap().status()];
    assert!(statuses.contains(&StatusCode::OK), "statuses: {statuses:?}");
    assert!(statuses.contains(&StatusCode::CONFLICT), "statuses: {statuses:?}");

    // Exactly one call made it past the lock and persisted a result.
    let stored: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM optimization_results WHERE product_id = $1")
            .bind(9004i64)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn engine_crash_persists_nothing_and_releases_the_lock() {
    let engine = FakeEngine::failing(|| EngineError::NonZeroExit {
        code: 3,
        stderr: "model blew up".into(),
    });
    let (app, pool) = build_test_app(Arc::new(engine)).await;
    let before = seed_product(&pool, 9005, Decimal::new(1999, 2), Decimal::new(800, 2)).await;

    let resp = app.clone().oneshot(optimize_request(9005, 18.50, "regular")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let stored: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM optimization_results WHERE product_id = $1")
            .bind(9005i64)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, 0);

    let price: Decimal = sqlx::query_scalar("SELECT price FROM products WHERE id = $1")
        .bind(9005i64)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(price, before.price);

    // A second attempt reaches the engine again instead of tripping the lock.
    let resp = app.oneshot(optimize_request(9005, 18.50, "regular")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn malformed_result_document_persists_nothing() {
    let engine =
        FakeEngine::failing(|| EngineError::Malformed("missing field `expected_profit`".into()));
    let (app, pool) = build_test_app(Arc::new(engine)).await;
    seed_product(&pool, 9006, Decimal::new(1999, 2), Decimal::new(800, 2)).await;

    let resp = app.oneshot(optimize_request(9006, 18.50, "regular")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let stored: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM optimization_results WHERE product_id = $1")
            .bind(9006i64)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, 0);

    let ledger: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM price_history WHERE product_id = $1")
            .bind(9006i64)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(ledger, 0);
}

#[tokio::test]
async fn optimization_history_is_newest_first() {
    let (app, pool) = build_test_app(Arc::new(FakeEngine::ok(sample_output()))).await;
    seed_product(&pool, 9007, Decimal::new(1999, 2), Decimal::new(800, 2)).await;

    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(optimize_request(9007, 18.50, "regular"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/products/9007/optimization-history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let newest =
        chrono::DateTime::parse_from_rfc3339(items[0]["created_at"].as_str().unwrap()).unwrap();
    let older =
        chrono::DateTime::parse_from_rfc3339(items[1]["created_at"].as_str().unwrap()).unwrap();
    assert!(newest >= older);
}
