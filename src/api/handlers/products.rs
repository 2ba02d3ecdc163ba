use axum::extract::{Path, State};
use axum::Json;

use super::ApiResponse;
use crate::db::{history_repo, product_repo};
use crate::errors::AppError;
use crate::models::{PriceHistoryEntry, Product};
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = product_repo::get_all_products(&state.db).await?;
    Ok(Json(ApiResponse::ok(products)))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let product = product_repo::get_product(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))?;
    Ok(Json(ApiResponse::ok(product)))
}

pub async fn price_history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<PriceHistoryEntry>>>, AppError> {
    product_repo::get_product(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))?;

    let entries = history_repo::get_history(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(entries)))
}
