//! Record cleaning

use crate::scrape::Record;
use serde_json::Value;

/// Removes empty fields from every record and drops emptied records
///
/// A field is removed when its value is null or the empty string. A record is
/// dropped only when nothing remains after field removal; a record with any
/// surviving field is kept regardless of which fields it lost. The operation
/// is idempotent.
pub fn clean_records(records: Vec<Record>) -> Vec<Record> {
    let total = records.len();
    let cleaned: Vec<Record> = records
        .into_iter()
        .map(|record| {
            record
                .into_iter()
                .filter(|(_, value)| !is_empty_value(value))
                .collect::<Record>()
        })
        .filter(|record| !record.is_empty())
        .collect();

    tracing::info!("Cleaned {} items -> {} valid items", total, cleaned.len());
    cleaned
}

/// A value is empty when it is null or an empty string
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
