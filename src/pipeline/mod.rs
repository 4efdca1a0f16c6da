//! Data pipeline: clean, persist, report
//!
//! A deterministic transform over one crawl's records:
//! - `clean_records` drops empty/null fields and fully-emptied records
//! - `Persister` writes the clean set to JSON and/or CSV
//! - `generate_report` computes a descriptive summary of the batch

mod clean;
mod persist;
mod report;

pub use clean::clean_records;
pub use persist::{OutputFormat, Persister};
pub use report::{generate_report, NumericStats, Report};
