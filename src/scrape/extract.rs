//! Record extraction from catalog pages
//!
//! Two pure functions turn fetched HTML into records:
//! - `extract_listing` finds every item container on a listing page and reads
//!   its partial field set (title, price, rating, stock flag, detail URL)
//! - `extract_detail` reads the full field set from one item's detail page
//!
//! Malformed sub-fields degrade to defaults instead of failing the item; the
//! only hard extraction failure is a detail page without a product title.

use crate::scrape::Record;
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};
use thiserror::Error;

/// Extraction errors for detail pages
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Detail page has no product title: {url}")]
    MissingTitle { url: String },

    #[error("Listing record has no detail url")]
    MissingDetailUrl,
}

/// Extracts all item records from a listing page
///
/// Each `article.product_pod` container yields one record. A container with
/// malformed sub-fields still yields a record with defaults; nothing short of
/// an unparseable document reduces the record count.
///
/// # Arguments
///
/// * `html` - The listing page body
/// * `base_url` - Origin base URL (no trailing slash) for absolutizing links
pub fn extract_listing(html: &str, base_url: &str) -> Vec<Record> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    if let Ok(container) = Selector::parse("article.product_pod") {
        for element in document.select(&container) {
            records.push(parse_listing_item(&element, base_url));
        }
    }

    records
}

/// Parses a single listing container into a record
fn parse_listing_item(element: &ElementRef, base_url: &str) -> Record {
    let mut record = Record::new();

    // Title comes from the link's title attribute, not its (truncated) text
    let link = Selector::parse("h3 a")
        .ok()
        .and_then(|sel| element.select(&sel).next());

    let title = link
        .and_then(|a| a.value().attr("title"))
        .unwrap_or("Unknown")
        .to_string();

    let price = Selector::parse("p.price_color")
        .ok()
        .and_then(|sel| element.select(&sel).next())
        .map(|p| parse_price(&element_text(&p)))
        .unwrap_or(0.0);

    let rating = Selector::parse("p.star-rating")
        .ok()
        .and_then(|sel| element.select(&sel).next())
        .map(|p| star_rating(&p))
        .unwrap_or(0);

    let in_stock = Selector::parse("p.instock.availability")
        .ok()
        .and_then(|sel| element.select(&sel).next())
        .map(|p| element_text(&p).contains("In stock"))
        .unwrap_or(false);

    let url = link
        .and_then(|a| a.value().attr("href"))
        .map(|href| normalize_item_url(href, base_url))
        .unwrap_or_default();

    record.insert("title".to_string(), Value::String(title));
    record.insert("price".to_string(), json!(price));
    record.insert("rating".to_string(), json!(rating));
    record.insert("in_stock".to_string(), Value::Bool(in_stock));
    record.insert("url".to_string(), Value::String(url));
    record
}

/// Extracts the enrichment record from an item's detail page
///
/// The product title is the only required field; everything else defaults
/// when absent or malformed. The author field is not exposed by the source
/// and is always the literal "Unknown"; the ISBN falls back to the UPC, or
/// "N/A" when the product table carries no UPC.
///
/// # Arguments
///
/// * `html` - The detail page body
/// * `url` - The detail page URL (recorded in the result and in errors)
pub fn extract_detail(html: &str, url: &str) -> Result<Record, ExtractError> {
    let document = Html::parse_document(html);
    let mut record = Record::new();

    let title = Selector::parse("h1")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|h| element_text(&h))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ExtractError::MissingTitle {
            url: url.to_string(),
        })?;

    record.insert("title".to_string(), Value::String(title));
    record.insert("category".to_string(), Value::String(breadcrumb_category(&document)));

    // Product information table: th/td rows mapped to typed fields
    let mut upc = None;
    if let Ok(row_sel) = Selector::parse("table.table-striped tr") {
        for row in document.select(&row_sel) {
            let Some((key, value)) = table_row(&row) else {
                continue;
            };
            match key.as_str() {
                "UPC" => {
                    upc = Some(value.clone());
                    record.insert("upc".to_string(), Value::String(value));
                }
                "Product Type" => {
                    record.insert("product_type".to_string(), Value::String(value));
                }
                "Price (excl. tax)" => {
                    record.insert("price_excl_tax".to_string(), json!(parse_price(&value)));
                }
                "Price (incl. tax)" => {
                    record.insert("price_incl_tax".to_string(), json!(parse_price(&value)));
                }
                "Tax" => {
                    record.insert("tax".to_string(), json!(parse_price(&value)));
                }
                "Availability" => {
                    record.insert(
                        "availability_count".to_string(),
                        json!(availability_count(&value)),
                    );
                    record.insert("availability".to_string(), Value::String(value));
                }
                "Number of reviews" => {
                    record.insert(
                        "review_count".to_string(),
                        json!(value.parse::<i64>().unwrap_or(0)),
                    );
                }
                _ => {}
            }
        }
    }

    record.insert(
        "description".to_string(),
        Value::String(description(&document)),
    );
    record.insert("author".to_string(), Value::String("Unknown".to_string()));
    record.insert(
        "isbn".to_string(),
        Value::String(upc.unwrap_or_else(|| "N/A".to_string())),
    );
    record.insert("url".to_string(), Value::String(url.to_string()));

    Ok(record)
}

/// Collects and trims the text content of an element
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses a currency-prefixed decimal, falling back to 0.0
///
/// Handles both "£51.77" and the mojibake form "Â£51.77" seen when the
/// origin's encoding is mishandled upstream.
fn parse_price(text: &str) -> f64 {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0.0)
}

/// Maps the star-rating class token to a numeric rating, 0 when unrecognized
fn star_rating(element: &ElementRef) -> u8 {
    for class in element.value().classes() {
        match class {
            "One" => return 1,
            "Two" => return 2,
            "Three" => return 3,
            "Four" => return 4,
            "Five" => return 5,
            _ => {}
        }
    }
    0
}

/// Normalizes a listing href into an absolute detail-page URL
///
/// Listing pages use relative hrefs with varying numbers of `../` markers
/// depending on the page's own depth; all items live under `/catalogue/`.
fn normalize_item_url(href: &str, base_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    let mut path = href;
    while let Some(rest) = path.strip_prefix("../") {
        path = rest;
    }
    let path = path.strip_prefix("catalogue/").unwrap_or(path);

    format!("{}/catalogue/{}", base_url, path)
}

/// Reads the category from the third breadcrumb entry, defaulting to "General"
fn breadcrumb_category(document: &Html) -> String {
    Selector::parse("ul.breadcrumb li")
        .ok()
        .and_then(|sel| document.select(&sel).nth(2))
        .map(|li| element_text(&li))
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "General".to_string())
}

/// Parses the item count out of an "In stock (N available)" availability string
fn availability_count(text: &str) -> i64 {
    let Some(open) = text.find('(') else {
        return 0;
    };
    text[open + 1..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Extracts the free-text description paragraph, empty when absent
fn description(document: &Html) -> String {
    Selector::parse("#product_description + p")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|p| element_text(&p))
        .unwrap_or_default()
}

/// Reads one th/td pair from a product table row
fn table_row(row: &ElementRef) -> Option<(String, String)> {
    let th = Selector::parse("th").ok()?;
    let td = Selector::parse("td").ok()?;
    let key = row.select(&th).next().map(|e| element_text(&e))?;
    let value = row.select(&td).next().map(|e| element_text(&e))?;
    Some((key, value))
}
