//! mcage - How old is that Minecraft version?
//!
//! Serves a page per Minecraft version telling how long ago it was released,
//! based on Mojang's public version manifest.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mcage::cache::{CacheManager, ManifestCache};
use mcage::cli::{Cli, StartupConfig};
use mcage::clock::{Clock, SystemClock};
use mcage::data::MojangClient;
use mcage::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = StartupConfig::from_cli(&cli)?;

    // Set up logging
    let log_level = if config.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Starting mcage");
    info!("Manifest cache: {}", config.cache_dir.display());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let source = Arc::new(MojangClient::new().with_url(config.manifest_url.clone()));
    let cache = Arc::new(ManifestCache::new(
        source,
        clock.clone(),
        CacheManager::with_dir(config.cache_dir.clone()),
    ));

    let addr = server::start_server(AppState::new(cache, clock), config.addr).await?;
    info!("Serving on http://{}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
