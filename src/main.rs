//! Tube router worker (v1)
//!
//! Reads jobs from stdin and runs them through a bounded router.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                   TUBE ROUTER                    │
//!                  │                                                  │
//!   stdin (NDJSON) │  ┌─────────┐    ┌─────────┐    ┌──────────────┐  │
//!   ───────────────┼─▶│ source  │───▶│ routing │───▶│ gate (tube)  │  │
//!                  │  │ lines   │    │ table   │    │ semaphore    │  │
//!                  │  └─────────┘    └─────────┘    └──────┬───────┘  │
//!                  │                                       │          │
//!                  │                                       ▼          │
//!                  │                               ┌──────────────┐   │
//!                  │                               │ tokio task   │   │
//!                  │                               │ handler.work │   │
//!                  │                               └──────────────┘   │
//!                  │                                                  │
//!                  │  ┌────────────────────────────────────────────┐  │
//!                  │  │           Cross-Cutting Concerns           │  │
//!                  │  │  config · observability · lifecycle        │  │
//!                  │  └────────────────────────────────────────────┘  │
//!                  └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;

use tube_router::config::loader::load_config;
use tube_router::lifecycle::run::run;
use tube_router::lifecycle::shutdown::drain;
use tube_router::lifecycle::{signals, startup, Shutdown};
use tube_router::observability::{logging, metrics};
use tube_router::source::LineSource;
use tube_router::WorkerConfig;

#[derive(Parser)]
#[command(name = "tube-router")]
#[command(about = "Dispatch jobs to per-tube handlers with concurrency limits", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration, print the tube table as JSON and exit.
    #[arg(long)]
    check: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run_worker(Cli::parse()));
    // A pending stdin read cannot be cancelled; don't wait for it.
    runtime.shutdown_background();
    result
}

async fn run_worker(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WorkerConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        tubes = config.tubes.len(),
        "tube-router starting"
    );

    let router = Arc::new(startup::build_router(&config)?);

    if cli.check {
        let mut stats = router.stats();
        stats.sort_by(|a, b| a.tube.cmp(&b.tube));
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    let mut source = LineSource::new(BufReader::new(tokio::io::stdin()));
    let stopped = run(&mut source, &router, &shutdown).await?;
    tracing::info!(reason = ?stopped, "Stopped reading jobs");

    let deadline = Duration::from_secs(config.shutdown.drain_timeout_secs);
    if !drain(&router, deadline).await {
        tracing::warn!("Exiting with jobs still in flight");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
