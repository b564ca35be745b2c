mod error;
mod migration;
mod models;
mod monitoring;
mod store;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

use crate::monitoring::{CheckEngine, ServiceProber};
use crate::store::ServiceStore;

/// Probe monitored services and update their uptime statistics.
///
/// Designed to be invoked by a host scheduler (cron or similar) with
/// non-overlapping runs; nothing guards against two concurrent runs writing
/// the same document.
#[derive(Debug, Parser)]
#[command(name = "vigil-check", version)]
struct Cli {
    /// Path to the service database document.
    #[arg(long, default_value = "docs/db.json")]
    db: PathBuf,
}

#[tokio::main]
async fn main() {
    logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        error!("Error during uptime check: {err:#}");
        process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    info!("Starting uptime checks...");

    let store = ServiceStore::new(&cli.db);
    let now = Utc::now().timestamp();
    let mut services = store.load(now)?;

    let engine = CheckEngine::new(Arc::new(ServiceProber::new()?));
    if engine.run(&mut services, now).await {
        store.save(&services)?;
        info!("Uptime checks completed and data saved");
    } else {
        info!("No checks needed at this time");
    }

    Ok(())
}
