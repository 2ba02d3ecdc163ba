pub mod subprocess;

pub use subprocess::SubprocessEngine;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::OptimizationParams;

/// Parameter document handed to the pricing computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineRequest {
    /// Correlation id; also used to randomize the scratch file names so
    /// concurrent requests never collide.
    #[serde(skip)]
    pub correlation_id: Uuid,
    #[serde(rename = "productId")]
    pub product_id: i64,
    pub parameters: OptimizationParams,
}

impl EngineRequest {
    pub fn new(product_id: i64, parameters: OptimizationParams) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            product_id,
            parameters,
        }
    }
}

/// Result document the computation must produce. The five required fields are
/// the schema contract; a document missing any of them is rejected as a parse
/// failure, not coerced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOutput {
    pub current_price: Decimal,
    pub optimal_price: Decimal,
    pub expected_sales: Decimal,
    pub expected_revenue: Decimal,
    pub expected_profit: Decimal,
    #[serde(default)]
    pub confidence: Option<Decimal>,
    #[serde(default)]
    pub elasticity: Option<Decimal>,
    #[serde(default)]
    pub market_position: Option<String>,
    #[serde(default)]
    pub trend: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("engine timed out after {0:?}")]
    TimedOut(std::time::Duration),

    #[error("engine exited cleanly but produced no result document")]
    MissingResult,

    #[error("result document malformed: {0}")]
    Malformed(String),

    #[error("could not encode parameter document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// The single boundary with the external pricing computation. Held behind a
/// trait object so tests can substitute a deterministic fake.
#[async_trait]
pub trait PricingEngine: Send + Sync {
    async fn optimize(&self, request: &EngineRequest) -> Result<EngineOutput, EngineError>;
}
