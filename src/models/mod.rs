pub mod history;
pub mod optimization;
pub mod product;

pub use history::PriceHistoryEntry;
pub use optimization::{OptimizationParams, OptimizationResult};
pub use product::Product;

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// Demand context the pricing engine is asked to optimize for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Regular,
    High,
    Low,
    Promotion,
}

impl Season {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "regular" => Some(Season::Regular),
            "high" => Some(Season::High),
            "low" => Some(Season::Low),
            "promotion" => Some(Season::Promotion),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Season::Regular => "regular",
            Season::High => "high",
            Season::Low => "low",
            Season::Promotion => "promotion",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// PriceSource
// ---------------------------------------------------------------------------

/// Origin tag for a price_history ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceSource {
    Manual,
    Optimization,
    Import,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::Manual => "MANUAL",
            PriceSource::Optimization => "OPTIMIZATION",
            PriceSource::Import => "IMPORT",
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_parses_case_insensitively() {
        assert_eq!(Season::from_api_str("PROMOTION"), Some(Season::Promotion));
        assert_eq!(Season::from_api_str("regular"), Some(Season::Regular));
        assert_eq!(Season::from_api_str("winter"), None);
    }

    #[test]
    fn price_source_displays_db_tag() {
        assert_eq!(PriceSource::Optimization.to_string(), "OPTIMIZATION");
    }
}
