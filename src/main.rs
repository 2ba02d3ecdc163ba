use std::sync::Arc;

use pricepilot::api::router::create_router;
use pricepilot::config::AppConfig;
use pricepilot::engine::SubprocessEngine;
use pricepilot::locks::ProductLocks;
use pricepilot::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database connected");

    let metrics_handle = metrics::init_metrics();
    let engine = Arc::new(SubprocessEngine::from_config(&config));

    tracing::info!(
        command = %config.engine_command,
        script = %config.engine_script.display(),
        timeout = ?config.engine_timeout,
        "Pricing engine configured"
    );

    let state = AppState {
        db: pool,
        config,
        engine,
        locks: ProductLocks::new(),
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
