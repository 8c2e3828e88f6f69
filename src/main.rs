//! finrecon - Command-line client for the reconciliation service
//!
//! # Overview
//!
//! This binary drives the same workflow a screen would:
//! - Logging infrastructure (file rotation + optional stderr output)
//! - Tokio async runtime for backend requests
//! - Settings loading ([`ConfigManager`]), overridden by command-line flags
//! - One command per run (`columns`, `reconcile`, `profiles list|delete`)
//!
//! # Execution Flow
//!
//! 1. Parse arguments
//! 2. Load `finrecon.yaml` and `FINRECON_*` overrides
//! 3. Initialize logging → <log_dir>/finrecon.<date>
//! 4. Create tokio runtime with 2 worker threads
//! 5. Run the command
//! 6. Log the metrics summary and shut down the runtime

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use finrecon::{APP_NAME, ConfigManager, Metrics, VERSION};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let mut settings = config_manager.load_settings()?;
    if let Some(url) = &cli.backend_url {
        settings.backend_url = url.clone();
    }
    settings.debug_mode |= cli.debug;

    // Held for the whole run so buffered log lines are flushed on exit
    let _log_guard = finrecon::logging::setup_logging_with_console(
        &settings.log_dir,
        APP_NAME,
        settings.debug_mode,
        cli.verbose,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("finrecon-worker")
        .build()
        .context("Failed to create tokio runtime")?;

    let metrics = Arc::new(Metrics::new());
    let result = runtime.block_on(cli::commands::dispatch(
        cli.command,
        &settings,
        Arc::clone(&metrics),
    ));

    metrics.log_summary();
    runtime.shutdown_timeout(Duration::from_secs(5));

    if let Err(error) = &result {
        tracing::error!("Command failed: {:#}", error);
    }
    tracing::info!("Shutdown complete");

    result
}
