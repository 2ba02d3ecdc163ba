use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the append-only price_history ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceHistoryEntry {
    pub id: Uuid,
    pub product_id: i64,
    pub price: Decimal,
    pub source: String,
    pub recorded_at: DateTime<Utc>,
}
