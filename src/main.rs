//! dblpfetch - DBLP Conference Publication Fetcher
//!
//! Fetches recent publications for a conference venue from DBLP and writes
//! per-year JSON data files plus an index.
//!
//! ## Usage
//!
//! ```bash
//! dblpfetch
//! dblpfetch --venue NDSS --output public/data/ndss
//! ```

use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::Parser;
use dblpfetch::pipeline::{self, PipelineConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// DBLP Conference Publication Fetcher
#[derive(Parser)]
#[command(name = "dblpfetch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Venue to index (DBLP venue name)
    #[arg(long, default_value = "NDSS")]
    venue: String,

    /// Explicit search query, repeatable; overrides the default query set
    #[arg(long = "query")]
    queries: Vec<String>,

    /// Per-query result cap
    #[arg(long, default_value_t = dblpfetch::dblp::DEFAULT_MAX_HITS)]
    max_hits: usize,

    /// Trailing window of years to retain, inclusive of the current year
    #[arg(long, default_value_t = pipeline::DEFAULT_WINDOW_YEARS)]
    window: i32,

    /// Delay between queries in milliseconds
    #[arg(long, default_value_t = pipeline::DEFAULT_QUERY_DELAY.as_millis() as u64)]
    delay_ms: u64,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    let current_year = Utc::now().year();
    let output_dir = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("public/data/{}", cli.venue.to_lowercase())));

    let mut config = PipelineConfig::for_venue(&cli.venue, current_year, output_dir);
    config.max_hits = cli.max_hits;
    config.window_years = cli.window;
    config.query_delay = Duration::from_millis(cli.delay_ms);
    config.queries = if cli.queries.is_empty() {
        pipeline::default_queries(&cli.venue, current_year, cli.window)
    } else {
        cli.queries
    };

    pipeline::run(&config).await?;
    Ok(())
}
