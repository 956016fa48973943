//! tallyd - Per-user day counter service
//!
//! This is the main entry point for the tallyd service.
//! It wires together all the components:
//! - Configuration loading
//! - Store initialization
//! - Startup recovery into the day registry
//! - The rollover/snapshot tick task
//! - The HTTP server

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tally_config::load_config;
use tally_core::{DayRegistry, SnapshotSchedule};
use tally_store::{SqliteStore, Store};
use tally_util::{Clock, SystemClock};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod http;

/// tallyd - Daily habit counters per user, persisted on schedule
#[derive(Parser, Debug)]
#[command(name = "tallyd")]
#[command(about = "Daily habit counters per user, persisted on schedule", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/tallyd/config.toml")]
    config: PathBuf,

    /// Listen address override (or set TALLY_LISTEN env var)
    #[arg(short, long, env = "TALLY_LISTEN")]
    listen: Option<String>,

    /// Data directory override (or set TALLY_DATA_DIR env var)
    #[arg(short, long, env = "TALLY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "tallyd starting");

    // Load configuration
    let settings = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    info!(
        config_path = %args.config.display(),
        user_count = settings.users.len(),
        "Configuration loaded"
    );

    let listen_addr = args
        .listen
        .clone()
        .unwrap_or_else(|| settings.service.listen_addr.clone());

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| settings.service.data_dir.clone());

    // Create data directory
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    // Initialize store
    let db_path = data_dir.join("tallyd.db");
    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?,
    );

    info!(db_path = %db_path.display(), "Store initialized");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let schedule = SnapshotSchedule {
        hours: settings.service.snapshot_hours.clone(),
        minute_window: settings.service.snapshot_minute_window,
    };

    // Recovery must complete before any request can mutate state
    let registry = DayRegistry::recover(
        &settings.usernames(),
        store.clone(),
        clock.clone(),
        schedule,
    )
    .context("Failed to recover day state from the store")?;

    let registry = Arc::new(Mutex::new(registry));
    let tick_interval = settings.service.tick_interval;

    let state = web::Data::new(http::AppState {
        registry: registry.clone(),
        store,
        clock,
        settings: Arc::new(settings),
    });

    // Rollover/snapshot tick, independent of request traffic
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(tick_interval);
        loop {
            timer.tick().await;
            let mut registry = registry.lock().await;
            registry.tick();
        }
    });

    info!(listen_addr = %listen_addr, "HTTP server starting");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(http::configure)
    })
    .bind(&listen_addr)
    .with_context(|| format!("Failed to bind {listen_addr}"))?
    .run()
    .await?;

    info!("Shutdown complete");
    Ok(())
}
