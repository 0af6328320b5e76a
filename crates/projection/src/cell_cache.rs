//! Memoizing LRU cache for grid cell coordinates.
//!
//! The cell-to-geodetic mapping is a pure function of the grid definition,
//! and the same cells are requested over and over (every time slice of the
//! dataset repeats the same locations). Entries never go stale, so there is
//! no invalidation beyond LRU eviction and explicit [`CellCoordinateCache::clear`].

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use heatmap_common::{GeoPoint, GridCell};

use crate::grid::Tm2Grid;

/// Default number of cells kept in memory.
pub const DEFAULT_CELL_CACHE_CAPACITY: usize = 10_000;

/// Statistics for the cell coordinate cache.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CellCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl CellCacheStats {
    /// Hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Thread-safe memo of `GridCell -> GeoPoint` for one grid definition.
///
/// Keys are exact integer cells; a lookup only ever returns the value
/// computed for that same cell on this cache's grid.
pub struct CellCoordinateCache {
    grid: Tm2Grid,
    cache: Mutex<LruCache<GridCell, GeoPoint>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CellCoordinateCache {
    /// Create an empty cache for `grid` holding at most `capacity` cells.
    pub fn new(grid: Tm2Grid, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let cache_size = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            grid,
            cache: Mutex::new(LruCache::new(cache_size)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Grid definition this cache converts against.
    pub fn grid(&self) -> &Tm2Grid {
        &self.grid
    }

    // Entries are inserted whole, so a poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, LruCache<GridCell, GeoPoint>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a cell, converting and inserting it on a miss.
    pub fn get_or_convert(&self, cell: GridCell) -> GeoPoint {
        if let Some(point) = self.lock().get(&cell).copied() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return point;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let point = self.grid.to_geo(cell);
        self.lock().put(cell, point);
        point
    }

    /// Look up a cell without converting on a miss.
    pub fn get(&self, cell: GridCell) -> Option<GeoPoint> {
        let found = self.lock().get(&cell).copied();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Batch-convert `cells` and insert every result.
    ///
    /// Returns the converted points in input order. Does not count towards
    /// hit/miss statistics. When `cells` exceeds the capacity only the most
    /// recent entries stay cached.
    pub fn prefill(&self, cells: &[GridCell]) -> Vec<GeoPoint> {
        let points = self.grid.batch_to_geo(cells);

        let mut cache = self.lock();
        for (cell, point) in cells.iter().zip(&points) {
            cache.put(*cell, *point);
        }
        drop(cache);

        tracing::debug!(
            cells = cells.len(),
            capacity = self.capacity,
            "Prefilled cell coordinate cache"
        );

        points
    }

    /// Current cache statistics.
    pub fn stats(&self) -> CellCacheStats {
        CellCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().len(),
            capacity: self.capacity,
        }
    }

    /// Drop all entries and reset statistics.
    pub fn clear(&self) {
        self.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for CellCoordinateCache {
    fn default() -> Self {
        Self::new(Tm2Grid::twd97(), DEFAULT_CELL_CACHE_CAPACITY)
    }
}
