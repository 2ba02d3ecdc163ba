use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::ApiResponse;
use crate::db::{product_repo, result_repo};
use crate::errors::AppError;
use crate::models::OptimizationResult;
use crate::services::apply;
use crate::services::optimizer::{self, RawParams};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    #[serde(rename = "productId")]
    pub product_id: i64,
    pub parameters: RawParams,
}

pub async fn optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<ApiResponse<OptimizationResult>>, AppError> {
    let result = optimizer::optimize_price(&state, req.product_id, &req.parameters).await?;
    Ok(Json(ApiResponse::ok(result)))
}

pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<OptimizationResult>>>, AppError> {
    product_repo::get_product(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))?;

    let results = result_repo::get_history(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(results)))
}

pub async fn apply(
    State(state): State<AppState>,
    Path((id, result_id)): Path<(i64, Uuid)>,
) -> Result<Json<ApiResponse<OptimizationResult>>, AppError> {
    let applied = apply::apply_optimization(&state, id, result_id).await?;
    Ok(Json(ApiResponse::ok(applied)))
}
