use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{PriceHistoryEntry, PriceSource};

/// Append one ledger row inside the apply transaction. Rows are never
/// updated afterwards.
pub async fn insert_entry(
    tx: &mut Transaction<'_, Postgres>,
    product_id: i64,
    price: Decimal,
    source: PriceSource,
) -> sqlx::Result<PriceHistoryEntry> {
    sqlx::query_as::<_, PriceHistoryEntry>(
        r#"
        INSERT INTO price_history (product_id, price, source)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(product_id)
    .bind(price)
    .bind(source.as_str())
    .fetch_one(&mut **tx)
    .await
}

/// Price history for a product, newest first.
pub async fn get_history(
    pool: &PgPool,
    product_id: i64,
) -> anyhow::Result<Vec<PriceHistoryEntry>> {
    let entries = sqlx::query_as::<_, PriceHistoryEntry>(
        "SELECT * FROM price_history WHERE product_id = $1 ORDER BY recorded_at DESC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
