//! Error types for building the data cache.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort construction of a [`crate::DataCache`].
///
/// Query-time absence of data is never an error; only the build can fail.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The data source could not be opened.
    #[error("cannot open data file {path:?}: {source}")]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header lacks one or more required fields.
    #[error("CSV missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The delimited text itself is malformed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A field failed to parse or is out of its valid range.
    #[error("invalid row at line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    /// Demographic shares do not sum to ~100 (only with share validation set to reject).
    #[error("malformed demographic shares at line {line}: {message}")]
    MalformedShares { line: u64, message: String },

    /// The load configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DataLoadError {
    /// Create a MissingFile error.
    pub fn missing_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MissingFile {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidRow error.
    pub fn invalid_row(line: u64, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            line,
            message: message.into(),
        }
    }

    /// Names of the missing columns, for a MissingColumns error.
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            Self::MissingColumns(cols) => Some(cols),
            _ => None,
        }
    }
}

/// Result type for data loading.
pub type Result<T> = std::result::Result<T, DataLoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_fields() {
        let err = DataLoadError::MissingColumns(vec!["sex_2".to_string(), "age_9".to_string()]);
        assert_eq!(err.to_string(), "CSV missing required columns: sex_2, age_9");
        assert_eq!(err.missing_columns().map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_missing_file_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DataLoadError::missing_file("data/data.csv", io);
        assert!(err.to_string().contains("data/data.csv"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.missing_columns().is_none());
    }
}
