//! Generators for synthetic occupancy datasets.
//!
//! Rows are described with [`SyntheticRow`] and rendered to the same CSV layout
//! the production dataset uses, so tests exercise the real loader.

use std::io::Write;

use heatmap_common::{AgeBucket, Gender, Metric};
use tempfile::NamedTempFile;

/// Identifier columns, in dataset order.
pub const KEY_COLUMNS: [&str; 5] = ["month", "gx", "gy", "hour", "day_type"];

/// One synthetic dataset row.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRow {
    pub month: u32,
    pub gx: u32,
    pub gy: u32,
    pub hour: u8,
    pub day_type: String,
    /// Values in [`Metric::ALL`] order.
    pub metrics: [f64; 4],
    /// Male, female percentages.
    pub gender: [f64; 2],
    /// Values in [`AgeBucket::ALL`] order.
    pub age: [f64; 10],
}

impl SyntheticRow {
    /// A row with one user per metric and evenly split demographics.
    pub fn new(month: u32, gx: u32, gy: u32, hour: u8, day_type: &str) -> Self {
        Self {
            month,
            gx,
            gy,
            hour,
            day_type: day_type.to_string(),
            metrics: [1.0; 4],
            gender: [50.0, 50.0],
            age: [10.0; 10],
        }
    }

    /// Set every metric to the same value.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.metrics = [weight; 4];
        self
    }

    /// Set a single metric.
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        self.metrics[metric.index()] = value;
        self
    }

    pub fn with_gender(mut self, male: f64, female: f64) -> Self {
        self.gender = [male, female];
        self
    }

    pub fn with_age(mut self, age: [f64; 10]) -> Self {
        self.age = age;
        self
    }
}

/// All column names in dataset order.
pub fn columns() -> Vec<&'static str> {
    let mut cols: Vec<&'static str> = KEY_COLUMNS.to_vec();
    cols.extend(Metric::ALL.iter().map(|m| m.column()));
    cols.extend(Gender::ALL.iter().map(|g| g.column()));
    cols.extend(AgeBucket::ALL.iter().map(|b| b.column()));
    cols
}

fn row_values(row: &SyntheticRow) -> Vec<String> {
    let mut values = vec![
        row.month.to_string(),
        row.gx.to_string(),
        row.gy.to_string(),
        row.hour.to_string(),
        row.day_type.clone(),
    ];
    values.extend(row.metrics.iter().map(|v| v.to_string()));
    values.extend(row.gender.iter().map(|v| v.to_string()));
    values.extend(row.age.iter().map(|v| v.to_string()));
    values
}

/// Render rows as CSV text with a header line.
pub fn render_csv(rows: &[SyntheticRow]) -> String {
    render_csv_without(rows, &[])
}

/// Render rows as CSV text, leaving out the named columns entirely.
pub fn render_csv_without(rows: &[SyntheticRow], omit: &[&str]) -> String {
    let keep: Vec<bool> = columns().iter().map(|c| !omit.contains(c)).collect();

    let mut out = String::new();
    let header: Vec<&str> = columns()
        .into_iter()
        .zip(&keep)
        .filter_map(|(c, k)| k.then_some(c))
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in rows {
        let values: Vec<String> = row_values(row)
            .into_iter()
            .zip(&keep)
            .filter_map(|(v, k)| k.then_some(v))
            .collect();
        out.push_str(&values.join(","));
        out.push('\n');
    }
    out
}

/// Write arbitrary CSV text to a temporary file.
///
/// The file is deleted when the returned handle is dropped.
pub fn write_csv(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Write rows as a complete dataset file.
pub fn write_dataset(rows: &[SyntheticRow]) -> NamedTempFile {
    write_csv(&render_csv(rows))
}

/// Generate a dense dataset: every cell for every month/hour/day type.
///
/// Weights follow `(gx + gy + hour) % 7 + 1` so every slice has a
/// predictable, non-zero total.
pub fn generate_dataset(
    months: &[u32],
    hours: &[u8],
    day_types: &[&str],
    cells: &[(u32, u32)],
) -> Vec<SyntheticRow> {
    let mut rows = Vec::with_capacity(months.len() * hours.len() * day_types.len() * cells.len());
    for &month in months {
        for &hour in hours {
            for day_type in day_types {
                for &(gx, gy) in cells {
                    let weight = ((gx + gy + hour as u32) % 7 + 1) as f64;
                    rows.push(SyntheticRow::new(month, gx, gy, hour, day_type).with_weight(weight));
                }
            }
        }
    }
    rows
}
