//! Common types shared across the heatmap crates.

pub mod bounds;
pub mod cell;
pub mod demographics;
pub mod metric;
pub mod time;

pub use bounds::GeoBounds;
pub use cell::{GeoPoint, GridCell};
pub use demographics::{AgeBucket, Gender};
pub use metric::{Metric, MetricParseError};
pub use time::TimeSliceKey;
