use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database row for the products table. Owned by the catalog; `price` is
/// mutated only by the apply engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub cost: Decimal,
    pub competitor_price: Option<Decimal>,
    pub source: Option<String>,
    pub historical_sales: Option<Decimal>,
    pub historical_price: Option<Decimal>,
    pub sales_velocity: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
