//! Row, query result and metadata types.

use serde::{Deserialize, Serialize};

use heatmap_common::{AgeBucket, GeoBounds, GeoPoint, Gender, GridCell, Metric};

/// One parsed dataset row, before coordinates are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Year-month as `YYYYMM`.
    pub month: u32,
    pub cell: GridCell,
    /// Hour of day, 0-23.
    pub hour: u8,
    pub day_type: String,
    /// Values in [`Metric::ALL`] order.
    pub metrics: [f64; 4],
    /// Percentages in [`Gender::ALL`] order.
    pub gender: [f64; 2],
    /// Percentages in [`AgeBucket::ALL`] order.
    pub age: [f64; 10],
}

impl ObservationRecord {
    pub fn metric(&self, metric: Metric) -> f64 {
        self.metrics[metric.index()]
    }

    pub fn gender_share(&self, gender: Gender) -> f64 {
        self.gender[gender.index()]
    }

    pub fn age_share(&self, bucket: AgeBucket) -> f64 {
        self.age[bucket.index()]
    }
}

/// A record with its cell center attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    pub record: ObservationRecord,
    pub geo: GeoPoint,
}

/// One entry of a heatmap layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    pub gx: u32,
    pub gy: u32,
    pub lat: f64,
    pub lng: f64,
    pub weight: f64,
}

impl HeatmapPoint {
    pub(crate) fn from_row(row: &ObservationRow, metric: Metric) -> Self {
        Self {
            gx: row.record.cell.gx,
            gy: row.record.cell.gy,
            lat: row.geo.lat,
            lng: row.geo.lng,
            weight: row.record.metric(metric),
        }
    }
}

/// Smallest and largest weight among `points`, for scaling heatmap intensity.
///
/// Returns `None` for an empty slice.
pub fn weight_range(points: &[HeatmapPoint]) -> Option<(f64, f64)> {
    points.iter().map(|p| p.weight).fold(None, |acc, w| match acc {
        None => Some((w, w)),
        Some((min, max)) => Some((min.min(w), max.max(w))),
    })
}

/// Weighted gender percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenderDistribution {
    pub male: f64,
    pub female: f64,
}

impl GenderDistribution {
    pub fn get(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }
}

/// Weighted age percentages, serialized under the dataset column names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgeDistribution {
    #[serde(rename = "age_1")]
    pub under_19: f64,
    #[serde(rename = "age_2")]
    pub age_20_24: f64,
    #[serde(rename = "age_3")]
    pub age_25_29: f64,
    #[serde(rename = "age_4")]
    pub age_30_34: f64,
    #[serde(rename = "age_5")]
    pub age_35_39: f64,
    #[serde(rename = "age_6")]
    pub age_40_44: f64,
    #[serde(rename = "age_7")]
    pub age_45_49: f64,
    #[serde(rename = "age_8")]
    pub age_50_54: f64,
    #[serde(rename = "age_9")]
    pub age_55_59: f64,
    #[serde(rename = "age_other")]
    pub age_60_plus: f64,
}

impl AgeDistribution {
    /// Build from values in [`AgeBucket::ALL`] order.
    pub fn from_array(values: [f64; 10]) -> Self {
        Self {
            under_19: values[0],
            age_20_24: values[1],
            age_25_29: values[2],
            age_30_34: values[3],
            age_35_39: values[4],
            age_40_44: values[5],
            age_45_49: values[6],
            age_50_54: values[7],
            age_55_59: values[8],
            age_60_plus: values[9],
        }
    }

    pub fn get(&self, bucket: AgeBucket) -> f64 {
        match bucket {
            AgeBucket::Under19 => self.under_19,
            AgeBucket::Age20To24 => self.age_20_24,
            AgeBucket::Age25To29 => self.age_25_29,
            AgeBucket::Age30To34 => self.age_30_34,
            AgeBucket::Age35To39 => self.age_35_39,
            AgeBucket::Age40To44 => self.age_40_44,
            AgeBucket::Age45To49 => self.age_45_49,
            AgeBucket::Age50To54 => self.age_50_54,
            AgeBucket::Age55To59 => self.age_55_59,
            AgeBucket::Age60Plus => self.age_60_plus,
        }
    }
}

/// Demographic breakdown of one time slice, weighted by an occupancy metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicSummary {
    /// Sum of the weighting metric over the slice.
    pub total_users: f64,
    pub gender: GenderDistribution,
    pub age: AgeDistribution,
}

impl DemographicSummary {
    /// The result for a slice with no users.
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.total_users == 0.0
    }
}

/// A dataset column with its display label, as offered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledOption {
    pub key: String,
    pub label: String,
}

impl LabeledOption {
    fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

impl From<Metric> for LabeledOption {
    fn from(metric: Metric) -> Self {
        Self::new(metric.column(), metric.label())
    }
}

impl From<Gender> for LabeledOption {
    fn from(gender: Gender) -> Self {
        Self::new(gender.column(), gender.label())
    }
}

impl From<AgeBucket> for LabeledOption {
    fn from(bucket: AgeBucket) -> Self {
        Self::new(bucket.column(), bucket.label())
    }
}

/// Summary of what the loaded dataset covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub months: Vec<u32>,
    pub hours: Vec<u8>,
    pub day_types: Vec<String>,
    pub metrics: Vec<LabeledOption>,
    pub genders: Vec<LabeledOption>,
    pub age_buckets: Vec<LabeledOption>,
    pub total_rows: usize,
    /// Distinct cells across the whole dataset.
    pub unique_locations: usize,
    /// Non-empty time slices.
    pub time_slice_count: usize,
    /// Box enclosing every cell center; `None` for an empty dataset.
    pub bounds: Option<GeoBounds>,
}
