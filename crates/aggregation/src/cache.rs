//! In-memory dataset with a time-slice index.
//!
//! The dataset is read once, every distinct cell is converted to
//! latitude/longitude in one batch, and rows are bucketed by
//! `(month, hour, day_type)`. Queries then only touch the rows of one bucket.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tracing::{debug, info, warn};

use heatmap_common::{AgeBucket, GeoBounds, GeoPoint, Gender, GridCell, Metric, TimeSliceKey};
use projection::{CellCacheStats, CellCoordinateCache, Tm2Grid, DEFAULT_CELL_CACHE_CAPACITY};

use crate::config::AggregationConfig;
use crate::error::{DataLoadError, Result};
use crate::loader::CsvLoader;
use crate::types::{
    AgeDistribution, DatasetMetadata, DemographicSummary, GenderDistribution, HeatmapPoint,
    LabeledOption, ObservationRecord, ObservationRow,
};

/// Immutable, indexed occupancy dataset.
///
/// All queries take `&self`; share it between threads behind an `Arc`.
pub struct DataCache {
    rows: Vec<ObservationRow>,
    /// Row indices per `(month, hour)` then per day type, in dataset order.
    /// Never holds empty buckets.
    index: HashMap<(u32, u8), HashMap<String, Vec<usize>>>,
    time_slice_count: usize,
    months: Vec<u32>,
    hours: Vec<u8>,
    day_types: Vec<String>,
    unique_locations: usize,
    bounds: Option<GeoBounds>,
    coordinates: CellCoordinateCache,
}

impl DataCache {
    /// Load the dataset at `path` with default settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_config(&AggregationConfig::with_path(path.as_ref()))
    }

    /// Load the dataset described by `config`.
    pub fn load_with_config(config: &AggregationConfig) -> Result<Self> {
        config.validate().map_err(DataLoadError::Config)?;

        info!(
            path = %config.data_path.display(),
            share_validation = %config.share_validation,
            "Loading occupancy dataset"
        );

        let records = CsvLoader::from_config(config).read_path(&config.data_path)?;
        info!(rows = records.len(), "Loaded dataset rows");

        Ok(Self::build(
            records,
            &config.grid(),
            config.coordinate_cache_capacity,
        ))
    }

    /// Build from records that were already parsed.
    pub fn from_rows(records: Vec<ObservationRecord>, grid: &Tm2Grid) -> Self {
        Self::build(records, grid, DEFAULT_CELL_CACHE_CAPACITY)
    }

    fn build(records: Vec<ObservationRecord>, grid: &Tm2Grid, cache_capacity: usize) -> Self {
        if records.is_empty() {
            warn!("Dataset has no rows; every query will return empty results");
        }

        let distinct: Vec<GridCell> = records
            .iter()
            .map(|r| r.cell)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // Sized so the whole dataset stays resident.
        let coordinates = CellCoordinateCache::new(*grid, cache_capacity.max(distinct.len()));
        let points = coordinates.prefill(&distinct);

        let outside = points
            .iter()
            .filter(|p| !GeoBounds::TAIWAN.contains(p))
            .count();
        if outside > 0 {
            warn!(
                cells = outside,
                "Grid cells convert to points outside the Taiwan region"
            );
        }
        info!(cells = distinct.len(), "Converted distinct grid cells");

        let bounds = GeoBounds::enclosing(&points);

        let located: HashMap<GridCell, GeoPoint> =
            distinct.iter().copied().zip(points).collect();

        let rows: Vec<ObservationRow> = records
            .into_iter()
            .map(|record| {
                let geo = located
                    .get(&record.cell)
                    .copied()
                    .unwrap_or_else(|| grid.to_geo(record.cell));
                ObservationRow { record, geo }
            })
            .collect();

        let mut index: HashMap<(u32, u8), HashMap<String, Vec<usize>>> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            let record = &row.record;
            let by_day_type = index.entry((record.month, record.hour)).or_default();
            match by_day_type.get_mut(record.day_type.as_str()) {
                Some(bucket) => bucket.push(i),
                None => {
                    by_day_type.insert(record.day_type.clone(), vec![i]);
                }
            }
        }
        let time_slice_count: usize = index.values().map(HashMap::len).sum();

        let months: BTreeSet<u32> = rows.iter().map(|r| r.record.month).collect();
        let hours: BTreeSet<u8> = rows.iter().map(|r| r.record.hour).collect();
        let day_types: BTreeSet<&str> = rows.iter().map(|r| r.record.day_type.as_str()).collect();
        let day_types: Vec<String> = day_types.into_iter().map(String::from).collect();

        info!(
            rows = rows.len(),
            time_slices = time_slice_count,
            months = months.len(),
            hours = hours.len(),
            day_types = day_types.len(),
            "Data cache initialized"
        );

        Self {
            unique_locations: distinct.len(),
            rows,
            index,
            time_slice_count,
            months: months.into_iter().collect(),
            hours: hours.into_iter().collect(),
            day_types,
            bounds,
            coordinates,
        }
    }

    fn bucket(
        &self,
        month: u32,
        hour: u8,
        day_type: &str,
    ) -> impl Iterator<Item = &ObservationRow> + '_ {
        self.index
            .get(&(month, hour))
            .and_then(|by_day_type| by_day_type.get(day_type))
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.rows[i])
    }

    /// Heatmap points of one time slice, weighted by `metric`.
    ///
    /// Empty when the slice has no rows. Points come back in dataset order.
    pub fn get_points(
        &self,
        month: u32,
        hour: u8,
        metric: Metric,
        day_type: &str,
    ) -> Vec<HeatmapPoint> {
        let points: Vec<HeatmapPoint> = self
            .bucket(month, hour, day_type)
            .map(|row| HeatmapPoint::from_row(row, metric))
            .collect();

        debug!(
            month = month,
            hour = hour,
            metric = %metric,
            day_type = day_type,
            points = points.len(),
            "Served heatmap points"
        );

        points
    }

    /// Demographic breakdown of one time slice, each share weighted by `metric`.
    ///
    /// Zero-filled when the slice is absent or its total weight is zero.
    pub fn get_demographics(
        &self,
        month: u32,
        hour: u8,
        metric: Metric,
        day_type: &str,
    ) -> DemographicSummary {
        let mut total = 0.0;
        let mut gender = [0.0; 2];
        let mut age = [0.0; 10];

        for row in self.bucket(month, hour, day_type) {
            let record = &row.record;
            let weight = record.metric(metric);
            total += weight;
            for g in Gender::ALL {
                gender[g.index()] += record.gender_share(g) * weight;
            }
            for b in AgeBucket::ALL {
                age[b.index()] += record.age_share(b) * weight;
            }
        }

        if total == 0.0 {
            return DemographicSummary::zeroed();
        }

        DemographicSummary {
            total_users: total,
            gender: GenderDistribution {
                male: gender[Gender::Male.index()] / total,
                female: gender[Gender::Female.index()] / total,
            },
            age: AgeDistribution::from_array(age.map(|v| v / total)),
        }
    }

    /// What the dataset covers.
    pub fn get_metadata(&self) -> DatasetMetadata {
        DatasetMetadata {
            months: self.months.clone(),
            hours: self.hours.clone(),
            day_types: self.day_types.clone(),
            metrics: Metric::ALL.into_iter().map(LabeledOption::from).collect(),
            genders: Gender::ALL.into_iter().map(LabeledOption::from).collect(),
            age_buckets: AgeBucket::ALL.into_iter().map(LabeledOption::from).collect(),
            total_rows: self.rows.len(),
            unique_locations: self.unique_locations,
            time_slice_count: self.time_slice_count,
            bounds: self.bounds,
        }
    }

    /// Whether `key` has at least one row.
    pub fn contains_slice(&self, key: &TimeSliceKey) -> bool {
        self.index
            .get(&(key.month, key.hour))
            .is_some_and(|by_day_type| by_day_type.contains_key(key.day_type.as_str()))
    }

    /// Every non-empty time slice, sorted.
    pub fn time_slices(&self) -> Vec<TimeSliceKey> {
        let mut keys: Vec<TimeSliceKey> = self
            .index
            .iter()
            .flat_map(|(&(month, hour), by_day_type)| {
                by_day_type
                    .keys()
                    .map(move |day_type| TimeSliceKey::new(month, hour, day_type.as_str()))
            })
            .collect();
        keys.sort();
        keys
    }

    /// All rows in dataset order.
    pub fn rows(&self) -> &[ObservationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Coordinates of any cell on this dataset's grid.
    pub fn locate(&self, cell: GridCell) -> GeoPoint {
        self.coordinates.get_or_convert(cell)
    }

    pub fn coordinate_stats(&self) -> CellCacheStats {
        self.coordinates.stats()
    }
}

impl std::fmt::Debug for DataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCache")
            .field("rows", &self.rows.len())
            .field("time_slices", &self.time_slice_count)
            .field("unique_locations", &self.unique_locations)
            .finish()
    }
}
