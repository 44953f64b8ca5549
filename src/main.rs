use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use tripwindow::api::AppState;
use tripwindow::config::AppConfig;
use tripwindow::store::{self, FjallStore};
use tripwindow::weather::OpenMeteoClient;
use tripwindow::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let store = FjallStore::open(&config.store.path)
        .with_context(|| format!("Failed to open store at {}", config.store.path))?;
    if config.store.seed_demo {
        store::seed_demo(&store).await?;
    }

    let weather = OpenMeteoClient::new(&config.weather)?;

    let state = AppState {
        store: Arc::new(store),
        weather: Arc::new(weather),
        horizon_days: config.search.horizon_days,
    };

    web::run(config.server.port, state).await
}
