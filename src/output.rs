//! Year partitioning and JSON dataset output.
//!
//! Groups deduplicated records by publication year inside the trailing
//! recency window and persists one `{year}.json` per retained year plus a
//! summary `index.json`. Files are fully overwritten each run; a year with no
//! records gets no file at all (absence means "no data found").

use crate::error::Result;
use crate::normalize::CanonicalRecord;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Contents of one per-year output file.
#[derive(Debug, Serialize, Deserialize)]
pub struct YearFile {
    pub conference: String,
    pub year: i32,
    pub items: Vec<CanonicalRecord>,
}

/// Per-year entry in the index file.
#[derive(Debug, Serialize, Deserialize)]
pub struct YearSummary {
    pub count: usize,
}

/// Contents of `index.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexFile {
    pub conference: String,
    pub years: BTreeMap<i32, YearSummary>,
    /// ISO-8601 generation timestamp
    pub last_updated: String,
}

/// Group records by year, dropping anything older than `min_year`.
///
/// Record order within a year follows input order.
pub fn partition_by_year(
    records: Vec<CanonicalRecord>,
    min_year: i32,
) -> BTreeMap<i32, Vec<CanonicalRecord>> {
    let mut by_year: BTreeMap<i32, Vec<CanonicalRecord>> = BTreeMap::new();

    for record in records {
        if record.year < min_year {
            continue;
        }
        by_year.entry(record.year).or_default().push(record);
    }

    by_year
}

/// Write per-year files and the index into `dir`, creating it if absent.
///
/// Each file is overwritten independently; there is no cross-file
/// transactionality, and a write failure aborts the run.
pub fn write_dataset(
    dir: &Path,
    conference: &str,
    by_year: &BTreeMap<i32, Vec<CanonicalRecord>>,
) -> Result<()> {
    fs::create_dir_all(dir)?;

    let mut years: BTreeMap<i32, YearSummary> = BTreeMap::new();

    for (year, items) in by_year {
        let year_file = YearFile {
            conference: conference.to_string(),
            year: *year,
            items: items.clone(),
        };

        let path = dir.join(format!("{}.json", year));
        fs::write(&path, serde_json::to_string_pretty(&year_file)?)?;
        info!(year = year, count = items.len(), path = %path.display(), "Wrote year file");

        years.insert(*year, YearSummary { count: items.len() });
    }

    let index = IndexFile {
        conference: conference.to_string(),
        years,
        last_updated: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    };

    let index_path = dir.join("index.json");
    fs::write(&index_path, serde_json::to_string_pretty(&index)?)?;
    info!(years = index.years.len(), path = %index_path.display(), "Wrote index");

    Ok(())
}
