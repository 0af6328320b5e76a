//! Grid cell to geodetic coordinate conversion.
//!
//! Implements the inverse Transverse Mercator projection from scratch and the
//! 50 m TM2 grid laid over it, plus a memoizing cache for repeated lookups.

pub mod cell_cache;
pub mod grid;
pub mod tm;

pub use cell_cache::{CellCacheStats, CellCoordinateCache, DEFAULT_CELL_CACHE_CAPACITY};
pub use grid::{batch_cell_to_latlon, cell_to_latlon, Tm2Grid, CELL_SIZE_M};
pub use tm::TransverseMercator;
