//! Configuration for loading the data cache.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use projection::{Tm2Grid, DEFAULT_CELL_CACHE_CAPACITY};

/// Configuration for building a [`crate::DataCache`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Path to the delimited dataset file.
    pub data_path: PathBuf,

    /// Capacity of the cell coordinate cache. Raised to the number of
    /// distinct cells at load time so every dataset cell stays cached.
    pub coordinate_cache_capacity: usize,

    /// How demographic share sums are checked at load time.
    pub share_validation: ShareValidation,

    /// Allowed deviation of a share group's sum from 100 (percentage points).
    pub share_tolerance: f64,

    /// Override of the grid's south-west origin `(x, y)` in meters.
    pub grid_origin: Option<(f64, f64)>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/data.csv"),
            coordinate_cache_capacity: DEFAULT_CELL_CACHE_CAPACITY,
            share_validation: ShareValidation::default(),
            share_tolerance: 1.0,
            grid_origin: None,
        }
    }
}

impl AggregationConfig {
    /// Config with defaults except for the data path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: path.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("HEATMAP_DATA_PATH") {
            config.data_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("HEATMAP_COORD_CACHE_CAPACITY") {
            if let Ok(size) = val.parse() {
                config.coordinate_cache_capacity = size;
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_SHARE_VALIDATION") {
            match val.parse() {
                Ok(policy) => config.share_validation = policy,
                Err(e) => warn!(
                    error = %e,
                    default = %config.share_validation,
                    "Ignoring HEATMAP_SHARE_VALIDATION"
                ),
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_SHARE_TOLERANCE") {
            if let Ok(tolerance) = val.parse() {
                config.share_tolerance = tolerance;
            }
        }

        let sw_x = std::env::var("HEATMAP_GRID_SW_X")
            .ok()
            .and_then(|v| v.parse().ok());
        let sw_y = std::env::var("HEATMAP_GRID_SW_Y")
            .ok()
            .and_then(|v| v.parse().ok());
        if let (Some(x), Some(y)) = (sw_x, sw_y) {
            config.grid_origin = Some((x, y));
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.data_path.as_os_str().is_empty() {
            return Err("data_path must not be empty".to_string());
        }

        if self.coordinate_cache_capacity == 0 {
            return Err("coordinate_cache_capacity must be > 0".to_string());
        }

        if !self.share_tolerance.is_finite() || self.share_tolerance < 0.0 {
            return Err("share_tolerance must be a non-negative number".to_string());
        }

        if let Some((x, y)) = self.grid_origin {
            if !x.is_finite() || !y.is_finite() {
                return Err("grid_origin must be finite".to_string());
            }
        }

        Ok(())
    }

    /// Grid definition to convert cells against.
    pub fn grid(&self) -> Tm2Grid {
        match self.grid_origin {
            Some((x, y)) => Tm2Grid::twd97().with_origin(x, y),
            None => Tm2Grid::twd97(),
        }
    }
}

/// Policy for rows whose gender or age shares do not sum to ~100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareValidation {
    /// Accept every row without checking.
    #[default]
    Trust,
    /// Accept every row, logging the ones that are off.
    Warn,
    /// Fail the load on the first row that is off.
    Reject,
}

impl ShareValidation {
    pub const ALL: [ShareValidation; 3] = [Self::Trust, Self::Warn, Self::Reject];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trust => "trust",
            Self::Warn => "warn",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for ShareValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a string does not name a share validation policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown share validation policy '{0}' (expected trust, warn or reject)")]
pub struct ShareValidationParseError(pub String);

impl FromStr for ShareValidation {
    type Err = ShareValidationParseError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ShareValidationParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AggregationConfig::default();
        assert_eq!(config.data_path, PathBuf::from("data/data.csv"));
        assert_eq!(config.coordinate_cache_capacity, 10_000);
        assert_eq!(config.share_validation, ShareValidation::Trust);
        assert!(config.grid_origin.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let invalid = [
            AggregationConfig {
                coordinate_cache_capacity: 0,
                ..Default::default()
            },
            AggregationConfig {
                share_tolerance: -1.0,
                ..Default::default()
            },
            AggregationConfig {
                data_path: PathBuf::new(),
                ..Default::default()
            },
            AggregationConfig {
                grid_origin: Some((f64::NAN, 0.0)),
                ..Default::default()
            },
        ];
        for config in invalid {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_share_validation_parse() {
        assert_eq!("warn".parse::<ShareValidation>(), Ok(ShareValidation::Warn));
        assert_eq!("REJECT".parse::<ShareValidation>(), Ok(ShareValidation::Reject));
        assert_eq!("trust".parse::<ShareValidation>(), Ok(ShareValidation::Trust));
        assert_eq!(ShareValidation::default(), ShareValidation::Trust);
    }

    #[test]
    fn test_share_validation_typo_is_an_error() {
        let err = "rejct".parse::<ShareValidation>().unwrap_err();
        assert_eq!(err, ShareValidationParseError("rejct".to_string()));
        assert!(err.to_string().contains("expected trust, warn or reject"));
    }

    #[test]
    fn test_grid_origin_override() {
        assert_eq!(AggregationConfig::default().grid(), Tm2Grid::twd97());

        let config = AggregationConfig {
            grid_origin: Some((-32871.4054, 2422126.0017)),
            ..Default::default()
        };
        let grid = config.grid();
        assert_eq!(grid.sw_x, -32871.4054);
        assert_eq!(grid.sw_y, 2422126.0017);
        assert_eq!(grid.cell_size, 50.0);
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_value(AggregationConfig::default()).unwrap();
        assert_eq!(json["share_validation"], "trust");
    }
}
