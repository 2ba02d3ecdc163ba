use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // External pricing engine (spawned per request)
    pub engine_command: String,
    pub engine_script: PathBuf,
    pub engine_work_dir: PathBuf,
    pub engine_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            engine_command: env::var("ENGINE_COMMAND").unwrap_or_else(|_| "python3".into()),
            engine_script: env::var("ENGINE_SCRIPT")
                .unwrap_or_else(|_| "ml/price_optimizer.py".into())
                .into(),
            engine_work_dir: env::var("ENGINE_WORK_DIR")
                .unwrap_or_else(|_| "/tmp/pricepilot".into())
                .into(),
            engine_timeout: Duration::from_secs(
                env::var("ENGINE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_ENGINE_TIMEOUT_SECS),
            ),
        })
    }
}
