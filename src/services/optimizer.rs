use metrics::{counter, histogram};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Instant;

use crate::db::{product_repo, result_repo};
use crate::engine::{EngineError, EngineRequest};
use crate::errors::AppError;
use crate::models::{OptimizationParams, OptimizationResult, Season};
use crate::AppState;

/// Unvalidated request parameters as they arrive on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawParams {
    pub competitor_price: Decimal,
    pub season: String,
}

impl RawParams {
    pub fn validate(&self) -> Result<OptimizationParams, AppError> {
        if self.competitor_price < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "competitor_price must be >= 0, got {}",
                self.competitor_price
            )));
        }
        let season = Season::from_api_str(&self.season).ok_or_else(|| {
            AppError::Validation(format!(
                "unknown season '{}' (expected regular|high|low|promotion)",
                self.season
            ))
        })?;

        Ok(OptimizationParams {
            competitor_price: self.competitor_price,
            season,
        })
    }
}

/// Run one optimization request end to end: validate, snapshot the product,
/// claim the per-product lock, call the pricing engine, persist the
/// recommendation. The lock guard drops on every exit path, so a failed
/// computation leaves no state behind besides a log line.
pub async fn optimize_price(
    state: &AppState,
    product_id: i64,
    raw_params: &RawParams,
) -> Result<OptimizationResult, AppError> {
    counter!("optimizations_requested_total").increment(1);

    let params = raw_params.validate()?;

    let product = product_repo::get_product(&state.db, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {product_id} not found")))?;

    // Non-blocking: a concurrent optimize or apply on this product wins.
    let _guard = state.locks.try_acquire(product_id).ok_or_else(|| {
        AppError::Conflict(format!(
            "An optimization for product {product_id} is already in progress"
        ))
    })?;

    // Baseline fixed here; never re-read after this point.
    let current_price = product.price;

    let request = EngineRequest::new(product_id, params.clone());
    tracing::info!(
        product_id,
        correlation_id = %request.correlation_id,
        season = %params.season,
        competitor_price = %params.competitor_price,
        "Running price optimization"
    );

    let started = Instant::now();
    let output = state.engine.optimize(&request).await.map_err(|e| {
        counter!("optimizations_failed_total").increment(1);
        tracing::warn!(
            product_id,
            correlation_id = %request.correlation_id,
            error = %e,
            "Price optimization failed"
        );
        match e {
            EngineError::MissingResult | EngineError::Malformed(_) => AppError::Parse(e.to_string()),
            _ => AppError::ComputationFailed(e.to_string()),
        }
    })?;
    histogram!("engine_duration_seconds").record(started.elapsed().as_secs_f64());

    let result = result_repo::insert_result(&state.db, product_id, current_price, &output, &params)
        .await
        .map_err(AppError::Persistence)?;

    counter!("optimizations_completed_total").increment(1);
    tracing::info!(
        product_id,
        result_id = %result.id,
        current_price = %result.current_price,
        optimal_price = %result.optimal_price,
        "Recommendation stored"
    );

    Ok(result)
}
