//! CSV reader for the occupancy dataset.
//!
//! Rows are read strictly: every required column must be present in the
//! header, and every field must parse as its type and fall in its valid
//! range. Any failure aborts the whole read.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use heatmap_common::time::is_valid_year_month;
use heatmap_common::{AgeBucket, Gender, GridCell, Metric};

use crate::config::{AggregationConfig, ShareValidation};
use crate::error::{DataLoadError, Result};
use crate::types::ObservationRecord;

/// Identifier columns every dataset must carry.
pub const KEY_COLUMNS: [&str; 5] = ["month", "gx", "gy", "hour", "day_type"];

/// Every column the loader requires, in dataset order.
pub fn required_columns() -> Vec<&'static str> {
    let mut cols: Vec<&'static str> = KEY_COLUMNS.to_vec();
    cols.extend(Metric::ALL.iter().map(|m| m.column()));
    cols.extend(Gender::ALL.iter().map(|g| g.column()));
    cols.extend(AgeBucket::ALL.iter().map(|b| b.column()));
    cols
}

/// Raw row as laid out in the file. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    month: u32,
    gx: u32,
    gy: u32,
    hour: u8,
    day_type: String,
    avg_total_users: f64,
    avg_users_under_10min: f64,
    avg_users_10_30min: f64,
    avg_users_over_30min: f64,
    sex_1: f64,
    sex_2: f64,
    age_1: f64,
    age_2: f64,
    age_3: f64,
    age_4: f64,
    age_5: f64,
    age_6: f64,
    age_7: f64,
    age_8: f64,
    age_9: f64,
    age_other: f64,
}

impl CsvRecord {
    fn into_record(self) -> ObservationRecord {
        ObservationRecord {
            month: self.month,
            cell: GridCell::new(self.gx, self.gy),
            hour: self.hour,
            day_type: self.day_type,
            metrics: [
                self.avg_total_users,
                self.avg_users_under_10min,
                self.avg_users_10_30min,
                self.avg_users_over_30min,
            ],
            gender: [self.sex_1, self.sex_2],
            age: [
                self.age_1,
                self.age_2,
                self.age_3,
                self.age_4,
                self.age_5,
                self.age_6,
                self.age_7,
                self.age_8,
                self.age_9,
                self.age_other,
            ],
        }
    }
}

/// Reads [`ObservationRecord`]s from delimited text.
#[derive(Debug, Clone, Copy)]
pub struct CsvLoader {
    share_validation: ShareValidation,
    share_tolerance: f64,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::from_config(&AggregationConfig::default())
    }
}

impl CsvLoader {
    pub fn new(share_validation: ShareValidation, share_tolerance: f64) -> Self {
        Self {
            share_validation,
            share_tolerance,
        }
    }

    pub fn from_config(config: &AggregationConfig) -> Self {
        Self::new(config.share_validation, config.share_tolerance)
    }

    /// Open and read the file at `path`.
    pub fn read_path(&self, path: &Path) -> Result<Vec<ObservationRecord>> {
        let file = File::open(path).map_err(|e| DataLoadError::missing_file(path, e))?;
        self.read(file)
    }

    /// Read every record from `source`, which must start with a header line.
    pub fn read<R: Read>(&self, source: R) -> Result<Vec<ObservationRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let missing: Vec<String> = required_columns()
            .into_iter()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(DataLoadError::MissingColumns(missing));
        }

        let mut records = Vec::new();
        let mut off_share_rows = 0usize;
        let mut raw = csv::StringRecord::new();

        while reader.read_record(&mut raw)? {
            let line = raw.position().map(|p| p.line()).unwrap_or(0);
            let parsed: CsvRecord = raw
                .deserialize(Some(&headers))
                .map_err(|e| DataLoadError::invalid_row(line, e.to_string()))?;
            let record = parsed.into_record();

            validate_record(&record, line)?;

            if let Some(message) = self.check_shares(&record) {
                match self.share_validation {
                    ShareValidation::Trust => {}
                    ShareValidation::Warn => {
                        off_share_rows += 1;
                        debug!(line, "{}", message);
                    }
                    ShareValidation::Reject => {
                        return Err(DataLoadError::MalformedShares { line, message });
                    }
                }
            }

            records.push(record);
        }

        if off_share_rows > 0 {
            warn!(
                rows = off_share_rows,
                tolerance = self.share_tolerance,
                "Rows with demographic shares not summing to 100"
            );
        }

        Ok(records)
    }

    /// Describe the first share group that is off by more than the tolerance.
    fn check_shares(&self, record: &ObservationRecord) -> Option<String> {
        if self.share_validation == ShareValidation::Trust {
            return None;
        }

        let gender_sum: f64 = record.gender.iter().sum();
        if (gender_sum - 100.0).abs() > self.share_tolerance {
            return Some(format!("gender shares sum to {:.2}", gender_sum));
        }

        let age_sum: f64 = record.age.iter().sum();
        if (age_sum - 100.0).abs() > self.share_tolerance {
            return Some(format!("age shares sum to {:.2}", age_sum));
        }

        None
    }
}

/// Range checks on a parsed record.
fn validate_record(record: &ObservationRecord, line: u64) -> Result<()> {
    if !is_valid_year_month(record.month) {
        return Err(DataLoadError::invalid_row(
            line,
            format!("month {} is not a YYYYMM value", record.month),
        ));
    }

    if record.hour > 23 {
        return Err(DataLoadError::invalid_row(
            line,
            format!("hour {} outside 0-23", record.hour),
        ));
    }

    if record.day_type.is_empty() {
        return Err(DataLoadError::invalid_row(line, "empty day_type"));
    }

    for metric in Metric::ALL {
        let value = record.metric(metric);
        if !value.is_finite() || value < 0.0 {
            return Err(DataLoadError::invalid_row(
                line,
                format!("{} must be a non-negative number, got {}", metric, value),
            ));
        }
    }

    if record.gender.iter().chain(&record.age).any(|v| !v.is_finite()) {
        return Err(DataLoadError::invalid_row(line, "non-finite demographic share"));
    }

    Ok(())
}
