//! Scraping module: fetching and record extraction
//!
//! This module contains the ingestion core, including:
//! - Rate-limited HTTP fetching
//! - Listing-page and detail-page record extraction
//! - The crawl loop with per-item fault isolation

mod engine;
mod extract;
mod fetcher;

pub use engine::ScrapeEngine;
pub use extract::{extract_detail, extract_listing, ExtractError};
pub use fetcher::{build_http_client, FetchError, PageFetcher};

/// A scraped record: an open set of fields keyed by name
///
/// Listing extraction produces the base fields; detail extraction merges
/// additional fields over them. No field is required.
pub type Record = serde_json::Map<String, serde_json::Value>;
