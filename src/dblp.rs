//! DBLP publication-search API client.
//!
//! Issues search queries against the DBLP `/search/publ/api` endpoint and
//! returns the raw hit records. Queries run strictly sequentially; a failed
//! query is logged and contributes zero hits without aborting the rest.

use crate::error::{FetchError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// DBLP publication search endpoint
const DBLP_API_URL: &str = "https://dblp.org/search/publ/api";

/// Contact email sent in the User-Agent, per DBLP API etiquette
const MAILTO: &str = "dblpfetch@example.com";

/// Default per-query result cap (DBLP maximum)
pub const DEFAULT_MAX_HITS: usize = 1000;

/// One raw search hit as returned by DBLP.
///
/// DBLP nests all publication fields under an `info` object; fields are kept
/// optional here and validated later during normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHit {
    #[serde(default)]
    pub info: HitInfo,
}

/// Publication fields of a hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitInfo {
    #[serde(default)]
    pub title: Option<String>,
    /// Year as a string, e.g. `"2023"`
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub authors: Option<AuthorContainer>,
    /// Electronic edition link (full text / PDF)
    #[serde(default)]
    pub ee: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
}

/// Container for the `authors.author` field.
///
/// DBLP serializes a single author as an object and multiple authors as an
/// array. The shape is resolved here, once, into a uniform name list so
/// nothing downstream branches on it.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorContainer {
    #[serde(default)]
    author: Option<OneOrMany>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<AuthorRef>),
    One(AuthorRef),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AuthorRef {
    Structured { text: String },
    Plain(String),
    Other(serde_json::Value),
}

impl AuthorRef {
    fn display_name(&self) -> String {
        match self {
            AuthorRef::Structured { text } => text.clone(),
            AuthorRef::Plain(s) => s.clone(),
            AuthorRef::Other(v) => v.to_string(),
        }
    }
}

impl AuthorContainer {
    /// Author display names in publication order; empty if the container
    /// holds no author entry.
    pub fn names(&self) -> Vec<String> {
        match &self.author {
            None => Vec::new(),
            Some(OneOrMany::One(a)) => vec![a.display_name()],
            Some(OneOrMany::Many(list)) => list.iter().map(AuthorRef::display_name).collect(),
        }
    }
}

// === DBLP API Response Types ===

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    hits: HitList,
}

#[derive(Debug, Default, Deserialize)]
struct HitList {
    /// Absent entirely when a query matches nothing
    #[serde(default)]
    hit: Vec<RawHit>,
}

/// DBLP API client.
pub struct DblpClient {
    client: reqwest::Client,
    base_url: String,
    max_hits: usize,
}

impl DblpClient {
    /// Create a new client with the given per-query result cap.
    pub fn new(max_hits: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("dblpfetch/1.0 (mailto:{})", MAILTO))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DBLP_API_URL.to_string(),
            max_hits,
        })
    }

    /// Override the endpoint URL (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Run one search query and return its raw hits.
    pub async fn search(&self, query: &str) -> Result<Vec<RawHit>> {
        debug!(query = query, "Fetching DBLP search page");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("h", &self.max_hits.to_string()),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                code: status.as_u16() as i32,
                message: format!("DBLP API error: {}", status),
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }

    /// Run all queries sequentially, concatenating hits in arrival order.
    ///
    /// A failed query is logged and treated as zero hits; the remaining
    /// queries still run. `delay` is inserted between consecutive queries to
    /// stay clear of DBLP rate limiting.
    pub async fn run_queries(&self, queries: &[String], delay: Duration) -> Vec<RawHit> {
        let mut all_hits = Vec::new();

        for (idx, query) in queries.iter().enumerate() {
            if idx > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.search(query).await {
                Ok(hits) => {
                    info!(query = %query, count = hits.len(), "Query complete");
                    all_hits.extend(hits);
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "Query failed, continuing with zero hits");
                }
            }
        }

        info!(total = all_hits.len(), "All queries complete");
        all_hits
    }
}

/// Parse a DBLP search response body into raw hits.
///
/// A structurally valid response with no `hit` array yields an empty vec.
fn parse_response(json_str: &str) -> Result<Vec<RawHit>> {
    let response: SearchResponse = serde_json::from_str(json_str)
        .map_err(|e| FetchError::Parse(format!("Failed to parse DBLP response: {}", e)))?;

    Ok(response.result.hits.hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_author_list() {
        let body = r#"{
            "result": {
                "hits": {
                    "@total": "1",
                    "hit": [{
                        "info": {
                            "title": "A Paper",
                            "year": "2023",
                            "authors": {
                                "author": [
                                    {"@pid": "1/1", "text": "Alice Smith"},
                                    {"@pid": "2/2", "text": "Bob Jones"}
                                ]
                            },
                            "ee": "https://example.org/a.pdf",
                            "doi": "10.1234/a"
                        }
                    }]
                }
            }
        }"#;

        let hits = parse_response(body).unwrap();
        assert_eq!(hits.len(), 1);
        let info = &hits[0].info;
        assert_eq!(info.title.as_deref(), Some("A Paper"));
        assert_eq!(info.year.as_deref(), Some("2023"));
        assert_eq!(
            info.authors.as_ref().unwrap().names(),
            vec!["Alice Smith", "Bob Jones"]
        );
        assert_eq!(info.ee.as_deref(), Some("https://example.org/a.pdf"));
        assert_eq!(info.doi.as_deref(), Some("10.1234/a"));
    }

    #[test]
    fn test_parse_response_single_author_object() {
        let body = r#"{
            "result": {
                "hits": {
                    "hit": [{
                        "info": {
                            "title": "Solo Work",
                            "year": "2024",
                            "authors": {"author": {"@pid": "3/3", "text": "Carol Lee"}}
                        }
                    }]
                }
            }
        }"#;

        let hits = parse_response(body).unwrap();
        assert_eq!(hits[0].info.authors.as_ref().unwrap().names(), vec!["Carol Lee"]);
    }

    #[test]
    fn test_parse_response_no_hits() {
        let body = r#"{"result": {"hits": {"@total": "0"}}}"#;
        let hits = parse_response(body).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_parse_response_missing_fields() {
        let body = r#"{"result": {"hits": {"hit": [{"info": {"title": "No Year"}}]}}}"#;
        let hits = parse_response(body).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].info.year.is_none());
        assert!(hits[0].info.authors.is_none());
    }

    #[tokio::test]
    async fn test_failed_query_treated_as_zero_hits() {
        // Unroutable endpoint: both queries fail, neither may abort the batch.
        let client = DblpClient::new(10)
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let queries = vec![
            "toc:db/conf/ndss/ndss2024.bht".to_string(),
            "venue:NDSS".to_string(),
        ];

        let hits = client.run_queries(&queries, Duration::ZERO).await;
        assert!(hits.is_empty());
    }

    #[test]
    fn test_author_container_plain_string() {
        let container: AuthorContainer =
            serde_json::from_str(r#"{"author": "Dan Wu"}"#).unwrap();
        assert_eq!(container.names(), vec!["Dan Wu"]);
    }
}
