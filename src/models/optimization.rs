use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Season;

/// Validated market parameters for one optimization request. Not persisted on
/// its own; embedded as provenance in the stored result's `parameters` column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationParams {
    /// Serialized as a plain JSON number: this struct is part of the wire
    /// document the external engine reads.
    #[serde(with = "rust_decimal::serde::float")]
    pub competitor_price: Decimal,
    pub season: Season,
}

/// Database row for optimization_results.
///
/// `current_price` is the product price snapshotted when the request was
/// accepted, never re-read afterwards. `applied_at` is null while the
/// recommendation is pending; once set the row is terminal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OptimizationResult {
    pub id: Uuid,
    pub product_id: i64,
    pub current_price: Decimal,
    pub optimal_price: Decimal,
    pub expected_sales: Decimal,
    pub expected_revenue: Decimal,
    pub expected_profit: Decimal,
    pub confidence: Option<Decimal>,
    pub elasticity: Option<Decimal>,
    pub market_position: Option<String>,
    pub trend: Option<String>,
    pub parameters: serde_json::Value,
    pub applied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OptimizationResult {
    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }
}
