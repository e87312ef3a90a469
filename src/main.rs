use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use feedblock::config::Config;
use feedblock::init::setup_logging;
use feedblock::rules::{MatcherSet, StoredRules};
use feedblock::state::FilterState;
use feedblock::sync::{HttpFetcher, JsonFileStore, RuleStore, SyncEngine};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Config
    let config_path = std::env::args().nth(1).unwrap_or("config.toml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).await?
    } else {
        Config::default()
    };

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting feedblock...");

    if !std::path::Path::new(&config_path).exists() {
        info!("Config file not found, using defaults.");
    }
    config.validate()?;

    // 3. Init Store & Load Persisted Rules
    let store = Arc::new(JsonFileStore::new(&config.storage_path));
    let initial = match store.load().await {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            info!("No persisted rules found, starting empty.");
            StoredRules::default()
        }
        Err(e) => {
            warn!("Failed to load persisted rules, starting empty: {}", e);
            StoredRules::default()
        }
    };

    // 4. Init Sync Engine & Run Initial Sync
    let fetcher = Arc::new(HttpFetcher::new());
    let mut engine = SyncEngine::new(fetcher, store, config.rules_url.clone(), initial);
    match engine.sync(config.overwrite_existing).await {
        Ok(report) => info!(
            "Initial sync: {} merged, {} skipped",
            report.merged, report.skipped
        ),
        Err(e) => warn!("Initial sync failed, continuing with local rules: {}", e),
    }

    // 5. Build Filter State
    let matchers = MatcherSet::build(engine.rules())?;
    let filter = FilterState::new(engine.rules().clone(), matchers);

    // 6. Spawn Periodic Sync Loop & Forced Refresh Channel
    let update_interval = Duration::from_secs(config.updates.interval_hours * 3600);
    let overwrite = config.overwrite_existing;
    let filter_for_loop = filter.clone();

    // Channel for forcing a sync from the API
    let (sync_tx, mut sync_rx) = tokio::sync::mpsc::channel::<()>(1);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(update_interval);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    info!("Scheduled rule sync...");
                }
                _ = sync_rx.recv() => {
                    info!("Forced rule sync triggered via API...");
                    interval.reset(); // Reset timer to avoid double sync
                }
            }
            match engine.sync(overwrite).await {
                Ok(_) => match MatcherSet::build(engine.rules()) {
                    Ok(matchers) => filter_for_loop.update(engine.rules().clone(), matchers),
                    Err(e) => error!("Failed to rebuild matchers: {}", e),
                },
                Err(e) => error!("Rule sync failed: {}", e),
            }
        }
    });

    // 7. Start API Server
    if config.api.enable {
        let api_filter = filter.clone();
        let api_config = config.clone();
        let api_sync_tx = sync_tx.clone();
        let api_port = config.api.port;

        tokio::spawn(async move {
            feedblock::api::start_api_server(api_filter, api_config, api_sync_tx, api_port).await;
        });
    }

    // 8. Graceful Shutdown
    signal::ctrl_c().await?;
    info!("Shutdown signal received.");

    Ok(())
}
