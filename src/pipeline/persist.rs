//! Record persistence to JSON and CSV
//!
//! Output files land under a fixed directory as `{name}.json` and/or
//! `{name}.csv` and are overwritten on every run. The read-side repository
//! polls these files by modification time.

use crate::scrape::Record;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;

/// Requested output encodings for one persist run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Both,
}

impl OutputFormat {
    fn wants_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    fn wants_csv(self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Both)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Both => "both",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "both" => Ok(OutputFormat::Both),
            other => Err(format!(
                "Format must be one of: json, csv, both (got '{}')",
                other
            )),
        }
    }
}

/// Writes record batches to the output directory
pub struct Persister {
    output_dir: PathBuf,
}

impl Persister {
    /// Creates a persister rooted at the given output directory
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Writes the records in each requested format
    ///
    /// Creates the output directory if absent and overwrites existing files
    /// with the same name. Returns the paths written, JSON first.
    ///
    /// # Arguments
    ///
    /// * `records` - The clean record batch
    /// * `name` - Filename stem (no extension)
    /// * `format` - Which encodings to write
    pub fn persist(
        &self,
        records: &[Record],
        name: &str,
        format: OutputFormat,
    ) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.output_dir)?;

        let mut paths = Vec::new();
        if format.wants_json() {
            paths.push(self.save_json(records, name)?);
        }
        if format.wants_csv() {
            paths.push(self.save_csv(records, name)?);
        }
        Ok(paths)
    }

    /// Writes the record list as a pretty-printed JSON array
    fn save_json(&self, records: &[Record], name: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.json", name));
        let file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(file, records)?;
        tracing::info!("Data saved to {}", path.display());
        Ok(path)
    }

    /// Writes one CSV row per record
    ///
    /// The column set is the sorted union of every key observed across the
    /// batch; records missing a column leave the cell blank.
    fn save_csv(&self, records: &[Record], name: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.csv", name));

        let columns = column_union(records);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&columns)?;

        for record in records {
            let row: Vec<String> = columns
                .iter()
                .map(|col| record.get(col).map(value_to_cell).unwrap_or_default())
                .collect();
            writer.write_record(&row)?;
        }
        writer.flush()?;

        tracing::info!("Data saved to {}", path.display());
        Ok(path)
    }
}

/// Sorted union of all keys observed across a record batch
pub(crate) fn column_union(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.keys().cloned())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Renders a JSON value as a CSV cell
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Nested structures are rare; fall back to their JSON text
        other => other.to_string(),
    }
}
