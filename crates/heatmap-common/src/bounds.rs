//! Geographic bounds used as sanity regions for converted coordinates.

use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// An axis-aligned latitude/longitude box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    /// Area of interest for the TWD97 TM2 grid, with a small margin around Taiwan.
    pub const TAIWAN: GeoBounds = GeoBounds {
        min_lat: 21.5,
        min_lng: 117.5,
        max_lat: 25.5,
        max_lng: 122.5,
    };

    pub fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        }
    }

    /// Check if a point lies inside the box (edges inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }

    /// Smallest box enclosing every point, or `None` for an empty input.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<GeoBounds> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = GeoBounds::new(first.lat, first.lng, first.lat, first.lng);

        for p in iter {
            bounds.min_lat = bounds.min_lat.min(p.lat);
            bounds.min_lng = bounds.min_lng.min(p.lng);
            bounds.max_lat = bounds.max_lat.max(p.lat);
            bounds.max_lng = bounds.max_lng.max(p.lng);
        }

        Some(bounds)
    }
}
