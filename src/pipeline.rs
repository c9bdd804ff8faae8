//! End-to-end fetch pipeline.
//!
//! Wires the four stages together: query execution, normalization,
//! deduplication, year partitioning and output. The in-memory stages are
//! exposed as [`process_hits`] so the pipeline can be exercised on fixture
//! hits without network I/O.

use crate::dblp::{DblpClient, RawHit};
use crate::dedup::dedup_records;
use crate::error::Result;
use crate::normalize::{normalize_hits, CanonicalRecord};
use crate::output::{partition_by_year, write_dataset};
use chrono::{Datelike, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Trailing-window size in years, inclusive of the current year.
pub const DEFAULT_WINDOW_YEARS: i32 = 5;

/// Delay between consecutive DBLP queries.
pub const DEFAULT_QUERY_DELAY: Duration = Duration::from_secs(2);

/// Pipeline configuration.
///
/// The former free-standing constants (endpoint, cap, window) all live here
/// so runs are reproducible from the config alone.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Venue display name, e.g. `"NDSS"`; lowercased where it appears in ids
    pub venue: String,
    pub queries: Vec<String>,
    pub max_hits: usize,
    pub window_years: i32,
    pub query_delay: Duration,
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    /// Default configuration for a venue: per-year TOC queries across the
    /// window plus a venue-wide query, with dedup absorbing the overlap.
    pub fn for_venue(venue: &str, current_year: i32, output_dir: PathBuf) -> Self {
        Self {
            venue: venue.to_string(),
            queries: default_queries(venue, current_year, DEFAULT_WINDOW_YEARS),
            max_hits: crate::dblp::DEFAULT_MAX_HITS,
            window_years: DEFAULT_WINDOW_YEARS,
            query_delay: DEFAULT_QUERY_DELAY,
            output_dir,
        }
    }
}

/// Oldest year retained by the trailing window.
pub fn min_retained_year(current_year: i32, window_years: i32) -> i32 {
    current_year - (window_years - 1)
}

/// Build the default query set for a venue.
///
/// One TOC query per year in the window, newest first, then one venue query
/// that covers anything the TOC listings miss.
pub fn default_queries(venue: &str, current_year: i32, window_years: i32) -> Vec<String> {
    let tag = venue.to_lowercase();
    let min_year = min_retained_year(current_year, window_years);

    let mut queries: Vec<String> = (min_year..=current_year)
        .rev()
        .map(|year| format!("toc:db/conf/{tag}/{tag}{year}.bht"))
        .collect();
    queries.push(format!("venue:{}", venue));
    queries
}

/// Run the in-memory stages on already-fetched hits.
///
/// Normalizes, deduplicates, then partitions into the trailing window.
pub fn process_hits(
    hits: &[RawHit],
    venue: &str,
    min_year: i32,
) -> BTreeMap<i32, Vec<CanonicalRecord>> {
    let records = normalize_hits(hits, venue);
    info!(hits = hits.len(), records = records.len(), "Normalized hits");

    let unique = dedup_records(records);
    partition_by_year(unique, min_year)
}

/// Execute the full pipeline: fetch, process, persist.
pub async fn run(config: &PipelineConfig) -> Result<()> {
    let current_year = Utc::now().year();
    let min_year = min_retained_year(current_year, config.window_years);

    info!(
        venue = %config.venue,
        queries = config.queries.len(),
        min_year = min_year,
        "Starting fetch pipeline"
    );

    let client = DblpClient::new(config.max_hits)?;
    let hits = client.run_queries(&config.queries, config.query_delay).await;

    let by_year = process_hits(&hits, &config.venue, min_year);
    for (year, items) in &by_year {
        info!(year = year, count = items.len(), "Year partition");
    }

    write_dataset(&config.output_dir, &config.venue, &by_year)?;

    info!(years = by_year.len(), dir = %config.output_dir.display(), "Pipeline complete");
    Ok(())
}
