//! Crawl engine: page iteration and detail merging
//!
//! The engine walks listing pages in order, extracts their item records, and
//! optionally enriches each record from its detail page. Failure containment
//! follows a fail-fast-on-page, fail-soft-on-item policy:
//! - a listing-page fetch failure stops the whole crawl, keeping the records
//!   gathered so far
//! - a per-item detail failure skips that item only

use crate::config::Config;
use crate::scrape::{extract_detail, extract_listing, ExtractError, PageFetcher, Record};
use crate::BookscoutError;

/// Runs one crawl invocation against a catalog origin
///
/// The engine owns its fetcher (and with it the HTTP session), so dropping
/// the engine releases the connection pool deterministically whether the
/// crawl succeeded or not.
pub struct ScrapeEngine {
    fetcher: PageFetcher,
    base_url: String,
}

impl ScrapeEngine {
    /// Creates an engine for the given origin
    ///
    /// # Arguments
    ///
    /// * `config` - Crate configuration (HTTP client settings, delay)
    /// * `base_url` - Catalog origin; a trailing slash is tolerated
    pub fn new(config: &Config, base_url: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            fetcher: PageFetcher::new(&config.http, config.scraper.delay_ms)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Crawls listing pages 1..=page_count, returning the accumulated records
    ///
    /// Records appear in page order, and in listing order within a page.
    /// Never fails: page-level and item-level errors are contained per the
    /// module policy and the partial accumulator is returned.
    ///
    /// # Arguments
    ///
    /// * `page_count` - Number of listing pages to walk
    /// * `fetch_details` - Whether to fetch and merge each item's detail page
    pub async fn crawl(&self, page_count: u32, fetch_details: bool) -> Vec<Record> {
        let mut records = Vec::new();

        for page in 1..=page_count {
            let url = format!("{}/catalogue/page-{}.html", self.base_url, page);

            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    // Fail fast on listing pages: later pages are skipped,
                    // records already gathered are kept
                    tracing::error!("Error scraping page {}: {}", page, e);
                    break;
                }
            };

            let listed = extract_listing(&body, &self.base_url);
            tracing::info!("Found {} items on page {}", listed.len(), page);

            for item in listed {
                if !fetch_details {
                    records.push(item);
                    continue;
                }

                match self.enrich(item).await {
                    Ok(merged) => records.push(merged),
                    Err(e) => {
                        // Fail soft on items: one bad detail page never
                        // aborts the crawl
                        tracing::warn!("Skipping item on page {}: {}", page, e);
                    }
                }
            }
        }

        tracing::info!("Total records scraped: {}", records.len());
        records
    }

    /// Fetches an item's detail page and merges its fields over the listing fields
    async fn enrich(&self, mut item: Record) -> Result<Record, BookscoutError> {
        let url = item
            .get("url")
            .and_then(|v| v.as_str())
            .filter(|u| !u.is_empty())
            .ok_or(ExtractError::MissingDetailUrl)?
            .to_string();

        let body = self.fetcher.fetch(&url).await?;
        let detail = extract_detail(&body, &url)?;

        // Detail fields win on key collision
        for (key, value) in detail {
            item.insert(key, value);
        }

        Ok(item)
    }
}
