//! # dblpfetch
//!
//! DBLP Conference Publication Fetcher
//!
//! Fetches publication metadata for a conference venue from the DBLP search
//! API, normalizes it into a flat record schema, deduplicates across
//! overlapping queries, and writes per-year JSON datasets plus an index.
//!
//! ## Modules
//!
//! - [`dblp`] - DBLP search API client and raw hit model
//! - [`normalize`] - Raw hit to canonical record conversion
//! - [`dedup`] - (title, year) deduplication
//! - [`output`] - Year partitioning and JSON dataset writer
//! - [`pipeline`] - End-to-end orchestration
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dblpfetch::pipeline::{self, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::for_venue("NDSS", 2026, "public/data/ndss".into());
//!     pipeline::run(&config).await?;
//!     Ok(())
//! }
//! ```

pub mod dblp;
pub mod dedup;
pub mod error;
pub mod normalize;
pub mod output;
pub mod pipeline;

pub use error::{FetchError, Result};
