use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::Product;

/// Fetch one product, or None if the id is unknown.
pub async fn get_product(pool: &PgPool, product_id: i64) -> anyhow::Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// All products, ordered by name.
pub async fn get_all_products(pool: &PgPool) -> anyhow::Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(products)
}

/// Lock a product row for the remainder of the transaction.
pub async fn get_product_for_update(
    tx: &mut Transaction<'_, Postgres>,
    product_id: i64,
) -> sqlx::Result<Option<Product>> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await
}

/// Set the live price. Transaction-scoped on purpose: the only caller is the
/// apply engine, which commits this together with the ledger insert and the
/// applied flag.
pub async fn update_price(
    tx: &mut Transaction<'_, Postgres>,
    product_id: i64,
    price: Decimal,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE products SET price = $2, updated_at = NOW() WHERE id = $1")
        .bind(product_id)
        .bind(price)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
