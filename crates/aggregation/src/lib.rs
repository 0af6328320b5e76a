//! Aggregation cache for the occupancy dataset.
//!
//! Loads the dataset once, attaches cell coordinates through the
//! [`projection`] crate and answers time-slice queries:
//!
//! - [`DataCache::get_points`]: heatmap points weighted by a metric
//! - [`DataCache::get_demographics`]: metric-weighted gender and age shares
//! - [`DataCache::get_metadata`]: months, hours, day types and coverage
//!
//! A time slice without data is never an error; it yields an empty list or
//! a zero-filled summary. Only building the cache can fail, with
//! [`DataLoadError`].

pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod types;

pub use cache::DataCache;
pub use config::{AggregationConfig, ShareValidation, ShareValidationParseError};
pub use error::{DataLoadError, Result};
pub use loader::{required_columns, CsvLoader};
pub use types::{
    weight_range, AgeDistribution, DatasetMetadata, DemographicSummary, GenderDistribution,
    HeatmapPoint, LabeledOption, ObservationRecord, ObservationRow,
};
