//! Raw hit normalization into the canonical record schema.
//!
//! Maps one DBLP hit to zero or one [`CanonicalRecord`]. Malformed hits
//! (empty title, missing or unparsable year) produce no record; normalization
//! never fails the run.

use crate::dblp::RawHit;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Constant identifying the origin API in every record.
pub const SOURCE: &str = "DBLP";

/// Maximum slug length in record ids
const SLUG_MAX_LEN: usize = 80;

/// Normalized publication record, the unit of all persisted output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// `"<venue>-<year>-<slug(title)>"`; slug collisions across distinct
    /// titles are tolerated, uniqueness is only guaranteed per (title, year)
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    /// Not sourced from DBLP, always empty
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub pdf_url: Option<String>,
    pub doi: Option<String>,
    pub source: String,
    /// `"<year>-01-01"`; day and month are unknown and defaulted
    pub published_at: String,
    pub year: i32,
    /// Reserved, always empty
    pub tags: Vec<String>,
}

/// Derive a filesystem/URL-safe slug from a title.
///
/// Lowercase, whitespace runs collapsed to single hyphens, everything outside
/// `[a-z0-9-]` stripped, truncated to 80 characters.
pub fn slugify(title: &str) -> String {
    let whitespace = Regex::new(r"\s+").unwrap_or_else(|_| Regex::new(r" ").expect("Space regex"));
    let invalid = Regex::new(r"[^a-z0-9\-]").unwrap_or_else(|_| Regex::new(r" ").expect("Space regex"));

    let lowered = title.trim().to_lowercase();
    let hyphenated = whitespace.replace_all(&lowered, "-");
    let mut slug = invalid.replace_all(&hyphenated, "").into_owned();
    slug.truncate(SLUG_MAX_LEN);
    slug
}

/// Normalize one raw hit.
///
/// Returns `None` when the hit has no usable title or year. All other fields
/// pass through as-is, with absent values kept absent rather than defaulted.
pub fn normalize(hit: &RawHit, venue_tag: &str) -> Option<CanonicalRecord> {
    let info = &hit.info;

    let title = info.title.as_deref().unwrap_or("").trim().to_string();
    if title.is_empty() {
        return None;
    }

    let year: i32 = info.year.as_deref()?.trim().parse().ok()?;
    if year <= 0 {
        return None;
    }

    let authors = info
        .authors
        .as_ref()
        .map(|a| a.names())
        .unwrap_or_default();

    let venue_tag = venue_tag.to_lowercase();
    let id = format!("{}-{}-{}", venue_tag, year, slugify(&title));

    Some(CanonicalRecord {
        id,
        title,
        authors,
        abstract_text: String::new(),
        pdf_url: info.ee.clone(),
        doi: info.doi.clone(),
        source: SOURCE.to_string(),
        published_at: format!("{}-01-01", year),
        year,
        tags: Vec::new(),
    })
}

/// Normalize a batch of hits, dropping the malformed ones.
pub fn normalize_hits(hits: &[RawHit], venue_tag: &str) -> Vec<CanonicalRecord> {
    hits.iter().filter_map(|h| normalize(h, venue_tag)).collect()
}
