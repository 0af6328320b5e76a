//! Accuracy and consistency tests for grid cell conversion.

use heatmap_common::{GeoBounds, GeoPoint, GridCell};
use projection::{batch_cell_to_latlon, cell_to_latlon, CellCoordinateCache, Tm2Grid};
use proptest::prelude::*;

// ============================================================================
// Known values
// ============================================================================

#[test]
fn test_sample_cell_range() {
    let (lat, lng) = cell_to_latlon(7165, 7152);
    assert!((25.03..=25.04).contains(&lat), "lat {}", lat);
    assert!((121.54..=121.55).contains(&lng), "lng {}", lng);
}

#[test]
fn test_points_across_grid_stay_in_taiwan() {
    let test_points = [
        (7000, 5000), // south
        (7500, 6500), // east coast
        (7000, 7000), // north
        (6000, 0),    // southern tip of the grid
        (8000, 8000), // north-east corner of the data extent
    ];

    for (gx, gy) in test_points {
        let point = GeoPoint::from(cell_to_latlon(gx, gy));
        assert!(
            GeoBounds::TAIWAN.contains(&point),
            "({}, {}) -> {:?} outside Taiwan bounds",
            gx,
            gy,
            point
        );
    }
}

#[test]
fn test_extreme_indices_do_not_panic() {
    // Far outside the grid the series still evaluates, just not to anything on Earth
    let far = GeoPoint::from(cell_to_latlon(u32::MAX, u32::MAX));
    assert!(far.is_finite());
    assert!(!GeoBounds::TAIWAN.contains(&far));

    let (lat, lng) = cell_to_latlon(0, 0);
    assert!(lat.is_finite() && lng.is_finite());
}

// ============================================================================
// Spacing
// ============================================================================

#[test]
fn test_adjacent_cells_east_are_one_cell_apart() {
    let (lat1, lng1) = cell_to_latlon(7000, 7000);
    let (lat2, lng2) = cell_to_latlon(7001, 7000);

    let lng_diff = (lng2 - lng1).abs();
    assert!(
        (0.0003..0.0006).contains(&lng_diff),
        "longitude difference {} not consistent with 50m cell size",
        lng_diff
    );
    // Moving east barely changes latitude
    assert!((lat2 - lat1).abs() < 0.00001);
}

#[test]
fn test_adjacent_cells_north_are_one_cell_apart() {
    let (lat1, lng1) = cell_to_latlon(7000, 7000);
    let (lat2, lng2) = cell_to_latlon(7000, 7001);

    let lat_diff = lat2 - lat1;
    assert!(
        (0.0003..0.0006).contains(&lat_diff),
        "latitude difference {} not consistent with 50m cell size",
        lat_diff
    );
    assert!((lng2 - lng1).abs() < 0.00001);
}

// ============================================================================
// Cache consistency
// ============================================================================

#[test]
fn test_cache_agrees_with_batch() {
    let grid = Tm2Grid::twd97();
    let cells: Vec<GridCell> = (0..200)
        .map(|i| GridCell::new(7100 + i % 20, 7100 + i / 20))
        .collect();
    let cache = CellCoordinateCache::new(grid, 64);

    let batch = grid.batch_to_geo(&cells);
    for (cell, expected) in cells.iter().zip(&batch) {
        assert_eq!(cache.get_or_convert(*cell), *expected);
    }
    // Second pass mixes hits and post-eviction misses; values must not change
    for (cell, expected) in cells.iter().zip(&batch).rev() {
        assert_eq!(cache.get_or_convert(*cell), *expected);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn conversion_is_deterministic(gx in 0u32..12_000, gy in 0u32..12_000) {
        let a = cell_to_latlon(gx, gy);
        let b = cell_to_latlon(gx, gy);
        prop_assert_eq!(a.0.to_bits(), b.0.to_bits());
        prop_assert_eq!(a.1.to_bits(), b.1.to_bits());
    }

    #[test]
    fn batch_equals_scalar(cells in prop::collection::vec((0u32..12_000, 0u32..12_000), 0..64)) {
        let gx: Vec<u32> = cells.iter().map(|c| c.0).collect();
        let gy: Vec<u32> = cells.iter().map(|c| c.1).collect();

        let (lats, lngs) = batch_cell_to_latlon(&gx, &gy);
        prop_assert_eq!(lats.len(), cells.len());
        prop_assert_eq!(lngs.len(), cells.len());

        for (i, &(x, y)) in cells.iter().enumerate() {
            let (lat, lng) = cell_to_latlon(x, y);
            prop_assert_eq!(lats[i].to_bits(), lat.to_bits());
            prop_assert_eq!(lngs[i].to_bits(), lng.to_bits());
        }
    }

    #[test]
    fn distinct_cells_have_distinct_centers(
        gx in 5_000u32..9_000,
        gy in 5_000u32..9_000,
        dx in 0u32..3,
        dy in 0u32..3,
    ) {
        prop_assume!(dx != 0 || dy != 0);
        let a = cell_to_latlon(gx, gy);
        let b = cell_to_latlon(gx + dx, gy + dy);
        prop_assert!(a != b);
    }
}
