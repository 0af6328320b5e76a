//! The TM2 50 m grid laid over the TWD97 Transverse Mercator projection.
//!
//! Grid cells are indexed by non-negative `(gx, gy)` from a fixed south-west
//! origin. A cell maps to the projected coordinates of its *center*:
//!
//! ```text
//! x = sw_x + (gx + 0.5) * cell_size
//! y = sw_y + (gy + 0.5) * cell_size
//! ```
//!
//! and from there through the inverse projection to latitude/longitude.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use heatmap_common::{GeoPoint, GridCell};

use crate::tm::TransverseMercator;

/// Edge length of one grid cell in meters.
pub const CELL_SIZE_M: f64 = 50.0;

/// Projected easting of the grid's south-west corner (meters).
pub const SW_X_OFFSET: f64 = -53412.9412;

/// Projected northing of the grid's south-west corner (meters).
pub const SW_Y_OFFSET: f64 = 2411952.2971;

/// Batches shorter than this are converted on the calling thread.
const PARALLEL_THRESHOLD: usize = 4096;

/// Definition of a regular grid over a Transverse Mercator projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tm2Grid {
    pub projection: TransverseMercator,
    /// Easting of the south-west corner (meters)
    pub sw_x: f64,
    /// Northing of the south-west corner (meters)
    pub sw_y: f64,
    /// Cell edge length (meters)
    pub cell_size: f64,
}

impl Tm2Grid {
    pub fn new(projection: TransverseMercator, sw_x: f64, sw_y: f64, cell_size: f64) -> Self {
        Self {
            projection,
            sw_x,
            sw_y,
            cell_size,
        }
    }

    /// The 50 m TWD97 TM2 grid used by the occupancy dataset.
    pub fn twd97() -> Self {
        Self::new(
            TransverseMercator::twd97_tm2(),
            SW_X_OFFSET,
            SW_Y_OFFSET,
            CELL_SIZE_M,
        )
    }

    /// Same grid with a different south-west origin.
    pub fn with_origin(mut self, sw_x: f64, sw_y: f64) -> Self {
        self.sw_x = sw_x;
        self.sw_y = sw_y;
        self
    }

    /// Projected coordinates (meters) of the cell center.
    pub fn cell_center(&self, cell: GridCell) -> (f64, f64) {
        let x = self.sw_x + (cell.gx as f64 + 0.5) * self.cell_size;
        let y = self.sw_y + (cell.gy as f64 + 0.5) * self.cell_size;
        (x, y)
    }

    /// Geodetic coordinates of the cell center.
    ///
    /// Total over all `u32` indices; cells far outside the projection's
    /// useful range give finite but geographically meaningless values.
    pub fn to_geo(&self, cell: GridCell) -> GeoPoint {
        let (x, y) = self.cell_center(cell);
        self.projection.inverse(x, y)
    }

    /// Convert many cells at once.
    ///
    /// Element `i` of the output is bit-identical to `self.to_geo(cells[i])`.
    /// Large batches are spread over the rayon thread pool.
    pub fn batch_to_geo(&self, cells: &[GridCell]) -> Vec<GeoPoint> {
        if cells.len() < PARALLEL_THRESHOLD {
            cells.iter().map(|&c| self.to_geo(c)).collect()
        } else {
            cells.par_iter().map(|&c| self.to_geo(c)).collect()
        }
    }
}

impl Default for Tm2Grid {
    fn default() -> Self {
        Self::twd97()
    }
}

/// Convert a grid cell on the default TM2 grid to `(lat, lng)` in degrees.
pub fn cell_to_latlon(gx: u32, gy: u32) -> (f64, f64) {
    Tm2Grid::twd97().to_geo(GridCell::new(gx, gy)).as_tuple()
}

/// Convert parallel sequences of grid indices to parallel latitude and
/// longitude sequences on the default TM2 grid.
///
/// # Panics
/// Panics if `gx` and `gy` have different lengths.
pub fn batch_cell_to_latlon(gx: &[u32], gy: &[u32]) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(
        gx.len(),
        gy.len(),
        "gx and gy sequences must have equal length"
    );

    let cells: Vec<GridCell> = gx
        .iter()
        .zip(gy)
        .map(|(&gx, &gy)| GridCell::new(gx, gy))
        .collect();

    Tm2Grid::twd97()
        .batch_to_geo(&cells)
        .into_iter()
        .map(|p| (p.lat, p.lng))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_center_uses_half_cell_offset() {
        let grid = Tm2Grid::twd97();
        let (x, y) = grid.cell_center(GridCell::new(0, 0));
        assert!((x - (SW_X_OFFSET + 25.0)).abs() < 1e-9);
        assert!((y - (SW_Y_OFFSET + 25.0)).abs() < 1e-9);

        let (x1, y1) = grid.cell_center(GridCell::new(1, 2));
        assert!((x1 - x - 50.0).abs() < 1e-9);
        assert!((y1 - y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_cell_lands_in_taipei() {
        let (lat, lng) = cell_to_latlon(7165, 7152);
        assert!((25.03..=25.04).contains(&lat), "lat {}", lat);
        assert!((121.54..=121.55).contains(&lng), "lng {}", lng);
        assert!((lat - 25.033311).abs() < 1e-5);
        assert!((lng - 121.543653).abs() < 1e-5);
    }

    #[test]
    fn test_with_origin_shifts_cells() {
        let base = Tm2Grid::twd97();
        let shifted = base.with_origin(SW_X_OFFSET + 50.0, SW_Y_OFFSET);
        let a = shifted.to_geo(GridCell::new(100, 200));
        let b = base.to_geo(GridCell::new(101, 200));
        assert!((a.lat - b.lat).abs() < 1e-9);
        assert!((a.lng - b.lng).abs() < 1e-9);
    }

    #[test]
    fn test_batch_matches_scalar_small() {
        let gx = [7165, 7166, 7167];
        let gy = [7152, 7152, 7152];
        let (lats, lngs) = batch_cell_to_latlon(&gx, &gy);
        assert_eq!(lats.len(), 3);
        for i in 0..3 {
            assert_eq!((lats[i], lngs[i]), cell_to_latlon(gx[i], gy[i]));
        }
    }

    #[test]
    fn test_batch_matches_scalar_parallel_path() {
        let grid = Tm2Grid::twd97();
        let cells: Vec<GridCell> = (0..PARALLEL_THRESHOLD as u32 + 10)
            .map(|i| GridCell::new(6500 + i % 900, 5000 + i / 3))
            .collect();
        let batch = grid.batch_to_geo(&cells);
        for (cell, point) in cells.iter().zip(&batch) {
            assert_eq!(*point, grid.to_geo(*cell));
        }
    }

    #[test]
    fn test_batch_empty() {
        let (lats, lngs) = batch_cell_to_latlon(&[], &[]);
        assert!(lats.is_empty());
        assert!(lngs.is_empty());
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn test_batch_length_mismatch_panics() {
        batch_cell_to_latlon(&[1, 2], &[1]);
    }
}
