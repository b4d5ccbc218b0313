//! AML Rule Service - Main Entry Point
//!
//! Usage: `aml-rules-server [config.toml]`. The config path may also be
//! given through `AML_RULES_CONFIG`.

use anyhow::Context;
use api::{init_logging, init_metrics, run_server, AppConfig, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("AML_RULES_CONFIG").ok());

    let config = AppConfig::load(config_path.as_deref()).context("failed to load configuration")?;
    init_logging(&config.logging)?;

    info!("=== AML Rule Service v{} ===", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config_path {
        info!("Configuration loaded from {}", path);
    }

    let metrics = init_metrics(&config.metrics)?;
    let state = AppState::from_config(&config)?.with_metrics(metrics).shared();

    run_server(&config, state).await?;

    Ok(())
}
