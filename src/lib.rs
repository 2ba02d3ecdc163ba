pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod errors;
pub mod locks;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::engine::PricingEngine;
use crate::locks::ProductLocks;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub engine: Arc<dyn PricingEngine>,
    pub locks: ProductLocks,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
