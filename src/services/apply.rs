use metrics::counter;
use uuid::Uuid;

use crate::db::{history_repo, product_repo, result_repo};
use crate::errors::AppError;
use crate::models::{OptimizationResult, PriceSource};
use crate::AppState;

/// Commit a stored recommendation as the product's live price.
///
/// The three mutations — price update, ledger insert, applied flag — run in
/// one transaction; a failure in any of them rolls back all of them. Applying
/// an already-applied result is a no-op rejected with `AlreadyApplied`.
pub async fn apply_optimization(
    state: &AppState,
    product_id: i64,
    result_id: Uuid,
) -> Result<OptimizationResult, AppError> {
    // Same keyed lock as the optimize path, so a commit never races a
    // recommendation being generated for the same product.
    let _guard = state.locks.try_acquire(product_id).ok_or_else(|| {
        AppError::Conflict(format!(
            "An optimization for product {product_id} is already in progress"
        ))
    })?;

    let mut tx = state.db.begin().await?;

    let result = result_repo::get_result_for_update(&mut tx, result_id, product_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Optimization result {result_id} not found for product {product_id}"
            ))
        })?;

    if result.is_applied() {
        // Terminal state; leave price and ledger untouched.
        return Err(AppError::AlreadyApplied);
    }

    let product = product_repo::get_product_for_update(&mut tx, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {product_id} not found")))?;

    product_repo::update_price(&mut tx, product_id, result.optimal_price).await?;
    history_repo::insert_entry(&mut tx, product_id, result.optimal_price, PriceSource::Optimization)
        .await?;
    let applied = result_repo::mark_applied(&mut tx, result_id).await?;

    tx.commit().await?;

    counter!("optimizations_applied_total").increment(1);
    tracing::info!(
        product_id,
        result_id = %result_id,
        old_price = %product.price,
        new_price = %applied.optimal_price,
        "Optimization applied"
    );

    Ok(applied)
}
