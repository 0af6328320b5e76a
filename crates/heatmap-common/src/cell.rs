//! Grid cells and geodetic points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One 50 m cell of the TM2 grid, addressed by integer indices.
///
/// `gx` runs east and `gy` runs north from the grid's south-west origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub gx: u32,
    pub gy: u32,
}

impl GridCell {
    pub fn new(gx: u32, gy: u32) -> Self {
        Self { gx, gy }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.gx, self.gy)
    }
}

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the point as a `(lat, lng)` tuple.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// True when both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}
