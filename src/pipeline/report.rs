//! Batch summary report
//!
//! Mirrors the read-side's expectations: item count, column inventory,
//! per-column missing-value counts, and descriptive statistics for numeric
//! columns (count, mean, sample std, min, quartiles, max).

use crate::pipeline::persist::column_union;
use crate::scrape::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Derived summary over one batch of clean records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Number of records in the batch
    pub total_items: usize,

    /// Sorted union of column names observed across the batch
    pub columns: Vec<String>,

    /// Per column, the number of records lacking that column
    pub missing_values: BTreeMap<String, u64>,

    /// Descriptive statistics for columns whose present values are all numeric
    pub numeric_stats: BTreeMap<String, NumericStats>,
}

/// Descriptive statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: u64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Computes the summary report for a batch
///
/// Returns `None` for an empty batch: the absence of data is an expected
/// outcome, not an error.
pub fn generate_report(records: &[Record]) -> Option<Report> {
    if records.is_empty() {
        return None;
    }

    let columns = column_union(records);

    let mut missing_values = BTreeMap::new();
    let mut numeric_stats = BTreeMap::new();

    for column in &columns {
        let missing = records
            .iter()
            .filter(|record| !record.contains_key(column))
            .count() as u64;
        missing_values.insert(column.clone(), missing);

        if let Some(values) = numeric_column(records, column) {
            numeric_stats.insert(column.clone(), describe(&values));
        }
    }

    Some(Report {
        total_items: records.len(),
        columns,
        missing_values,
        numeric_stats,
    })
}

/// Collects a column's values when every present value is numeric
///
/// Returns `None` when the column holds any non-numeric value or no values
/// at all, matching how a dataframe would type the column.
fn numeric_column(records: &[Record], column: &str) -> Option<Vec<f64>> {
    let mut values = Vec::new();
    for record in records {
        match record.get(column) {
            Some(value) => values.push(value.as_f64()?),
            None => {}
        }
    }
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Computes descriptive statistics over a non-empty value set
fn describe(values: &[f64]) -> NumericStats {
    let count = values.len() as u64;
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    // Sample standard deviation (n - 1); zero for a single observation
    let std = if values.len() > 1 {
        let variance = values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / (values.len() - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    NumericStats {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    }
}

/// Linear-interpolated quantile over sorted values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_empty_batch_yields_none() {
        assert!(generate_report(&[]).is_none());
    }

    #[test]
    fn test_report_counts_and_columns() {
        let records = vec![
            record(&[("title", json!("A")), ("price", json!(10.0))]),
            record(&[("title", json!("B"))]),
        ];

        let report = generate_report(&records).unwrap();
        assert_eq!(report.total_items, 2);
        assert_eq!(report.columns, vec!["price", "title"]);
        assert_eq!(report.missing_values["price"], 1);
        assert_eq!(report.missing_values["title"], 0);
    }

    #[test]
    fn test_numeric_stats_selection() {
        let records = vec![
            record(&[("price", json!(1.0)), ("title", json!("A")), ("rating", json!(2))]),
            record(&[("price", json!(3.0)), ("title", json!("B")), ("rating", json!(4))]),
        ];

        let report = generate_report(&records).unwrap();
        assert!(report.numeric_stats.contains_key("price"));
        assert!(report.numeric_stats.contains_key("rating"));
        assert!(!report.numeric_stats.contains_key("title"));
    }

    #[test]
    fn test_mixed_typed_column_is_not_numeric() {
        let records = vec![
            record(&[("x", json!(1.0))]),
            record(&[("x", json!("two"))]),
        ];
        let report = generate_report(&records).unwrap();
        assert!(!report.numeric_stats.contains_key("x"));
    }

    #[test]
    fn test_describe_matches_pandas_semantics() {
        // pandas .describe() of [1, 2, 3, 4]:
        //   mean 2.5, std 1.2909944..., 25% 1.75, 50% 2.5, 75% 3.25
        let stats = describe(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stats.count, 4);
        assert!((stats.mean - 2.5).abs() < 1e-9);
        assert!((stats.std - 1.2909944487358056).abs() < 1e-9);
        assert!((stats.q25 - 1.75).abs() < 1e-9);
        assert!((stats.median - 2.5).abs() < 1e-9);
        assert!((stats.q75 - 3.25).abs() < 1e-9);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn test_single_observation() {
        let stats = describe(&[7.0]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 7.0);
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.min, 7.0);
        assert_eq!(stats.q25, 7.0);
        assert_eq!(stats.median, 7.0);
        assert_eq!(stats.q75, 7.0);
        assert_eq!(stats.max, 7.0);
    }

    #[test]
    fn test_column_missing_in_some_records_still_numeric() {
        let records = vec![
            record(&[("price", json!(2.0))]),
            record(&[("title", json!("no price"))]),
            record(&[("price", json!(4.0))]),
        ];

        let report = generate_report(&records).unwrap();
        let stats = &report.numeric_stats["price"];
        assert_eq!(stats.count, 2);
        assert!((stats.mean - 3.0).abs() < 1e-9);
        assert_eq!(report.missing_values["price"], 1);
    }

    #[test]
    fn test_report_serializes_round_trip() {
        let records = vec![record(&[("price", json!(1.5)), ("title", json!("A"))])];
        let report = generate_report(&records).unwrap();

        let text = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }
}
