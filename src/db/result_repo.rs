use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::engine::EngineOutput;
use crate::models::{OptimizationParams, OptimizationResult};

/// Persist a freshly computed recommendation. Append-only: the only later
/// mutation a row ever sees is `mark_applied`.
///
/// `current_price` is the gateway's snapshot, not whatever the engine echoed
/// back; the baseline is fixed at request time.
pub async fn insert_result(
    pool: &PgPool,
    product_id: i64,
    current_price: Decimal,
    output: &EngineOutput,
    params: &OptimizationParams,
) -> sqlx::Result<OptimizationResult> {
    let parameters =
        serde_json::to_value(params).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    let result = sqlx::query_as::<_, OptimizationResult>(
        r#"
        INSERT INTO optimization_results (
            product_id, current_price, optimal_price, expected_sales,
            expected_revenue, expected_profit, confidence, elasticity,
            market_position, trend, parameters
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(product_id)
    .bind(current_price)
    .bind(output.optimal_price)
    .bind(output.expected_sales)
    .bind(output.expected_revenue)
    .bind(output.expected_profit)
    .bind(output.confidence)
    .bind(output.elasticity)
    .bind(&output.market_position)
    .bind(&output.trend)
    .bind(parameters)
    .fetch_one(pool)
    .await?;

    Ok(result)
}

/// Recommendation history for a product, newest first.
pub async fn get_history(
    pool: &PgPool,
    product_id: i64,
) -> anyhow::Result<Vec<OptimizationResult>> {
    let results = sqlx::query_as::<_, OptimizationResult>(
        "SELECT * FROM optimization_results WHERE product_id = $1 ORDER BY created_at DESC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(results)
}

/// Fetch a result by (id, product) and lock it for the transaction. Returns
/// None when the result does not exist or belongs to another product.
pub async fn get_result_for_update(
    tx: &mut Transaction<'_, Postgres>,
    result_id: Uuid,
    product_id: i64,
) -> sqlx::Result<Option<OptimizationResult>> {
    sqlx::query_as::<_, OptimizationResult>(
        "SELECT * FROM optimization_results WHERE id = $1 AND product_id = $2 FOR UPDATE",
    )
    .bind(result_id)
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Flip a pending result to Applied. Terminal: the WHERE guard refuses rows
/// that already carry a timestamp.
pub async fn mark_applied(
    tx: &mut Transaction<'_, Postgres>,
    result_id: Uuid,
) -> sqlx::Result<OptimizationResult> {
    sqlx::query_as::<_, OptimizationResult>(
        r#"
        UPDATE optimization_results
        SET applied_at = NOW()
        WHERE id = $1 AND applied_at IS NULL
        RETURNING *
        "#,
    )
    .bind(result_id)
    .fetch_one(&mut **tx)
    .await
}
