//! Cross-query deduplication of normalized records.
//!
//! Overlapping queries return the same publication more than once; records
//! are considered the same publication when they share a
//! (lowercased trimmed title, year) key.

use crate::normalize::CanonicalRecord;
use std::collections::HashSet;
use tracing::debug;

/// Identity key for deduplication.
///
/// Derived from the record, not stored on it; the record `id` is slugified
/// and truncated, so it is deliberately NOT used as the key.
fn dedup_key(record: &CanonicalRecord) -> (String, i32) {
    (record.title.trim().to_lowercase(), record.year)
}

/// Keep at most one record per (title, year) key.
///
/// First occurrence in traversal order wins; later duplicates are discarded
/// whole, with no field-level merging, even when they carry fields the winner
/// lacks. Survivor order matches input order.
pub fn dedup_records(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let input_len = records.len();
    let mut seen: HashSet<(String, i32)> = HashSet::new();
    let mut unique = Vec::with_capacity(input_len);

    for record in records {
        if seen.insert(dedup_key(&record)) {
            unique.push(record);
        }
    }

    debug!(
        input = input_len,
        unique = unique.len(),
        dropped = input_len - unique.len(),
        "Deduplication complete"
    );
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: i32, doi: Option<&str>) -> CanonicalRecord {
        CanonicalRecord {
            id: format!("ndss-{}-{}", year, title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
            authors: vec![],
            abstract_text: String::new(),
            pdf_url: None,
            doi: doi.map(String::from),
            source: "DBLP".to_string(),
            published_at: format!("{}-01-01", year),
            year,
            tags: vec![],
        }
    }

    #[test]
    fn test_first_occurrence_wins_no_merge() {
        let records = vec![
            record("Example Paper", 2023, None),
            record("Example Paper", 2023, Some("10.1234/richer")),
        ];
        let unique = dedup_records(records);
        assert_eq!(unique.len(), 1);
        // The later duplicate's DOI must not be merged in.
        assert!(unique[0].doi.is_none());
    }

    #[test]
    fn test_key_is_case_insensitive_title() {
        let records = vec![
            record("Example Paper", 2023, None),
            record("EXAMPLE PAPER", 2023, None),
            record("example paper", 2023, None),
        ];
        assert_eq!(dedup_records(records).len(), 1);
    }

    #[test]
    fn test_same_title_different_year_kept() {
        let records = vec![
            record("Example Paper", 2022, None),
            record("Example Paper", 2023, None),
        ];
        assert_eq!(dedup_records(records).len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record("A", 2023, None),
            record("B", 2023, None),
            record("A", 2023, Some("10.1/x")),
        ];
        let once = dedup_records(records);
        let twice = dedup_records(once.clone());
        assert_eq!(once.len(), twice.len());
        let keys: Vec<_> = once.iter().map(|r| (r.title.clone(), r.year)).collect();
        let keys_twice: Vec<_> = twice.iter().map(|r| (r.title.clone(), r.year)).collect();
        assert_eq!(keys, keys_twice);
    }

    #[test]
    fn test_key_set_order_independent() {
        let forward = vec![
            record("A", 2023, Some("10.1/a")),
            record("B", 2024, None),
            record("A", 2023, None),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let keys = |records: Vec<CanonicalRecord>| -> HashSet<(String, i32)> {
            dedup_records(records)
                .iter()
                .map(|r| (r.title.to_lowercase(), r.year))
                .collect()
        };

        assert_eq!(keys(forward), keys(reversed));
    }

    #[test]
    fn test_preserves_survivor_order() {
        let records = vec![
            record("C", 2023, None),
            record("A", 2023, None),
            record("C", 2023, None),
            record("B", 2023, None),
        ];
        let titles: Vec<_> = dedup_records(records).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }
}
