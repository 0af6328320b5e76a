//! Transverse Mercator inverse projection.
//!
//! Maps projected easting/northing (meters) back to geodetic latitude and
//! longitude on an ellipsoid. The inverse needs the *footpoint latitude*:
//! the latitude whose meridian arc length from the equator equals the
//! (unscaled) northing. There is no closed form for it with the series used
//! here, so it is found by bisection on the monotonic arc-length function.
//!
//! The projection parameters include:
//! - Ellipsoid: semi-major axis `a` and eccentricity squared `e2`
//! - Scale factor on the central meridian `k0`
//! - Central meridian longitude
//! - False easting (false northing is zero)

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use heatmap_common::GeoPoint;

/// Bisection stops once the arc length is within this many meters of the target.
pub const FOOTPOINT_TOLERANCE_M: f64 = 0.001;

/// Hard cap on bisection steps. Convergence normally takes 30-35 steps.
pub const FOOTPOINT_MAX_ITERATIONS: usize = 1000;

/// Search bracket for the footpoint latitude, in degrees.
const FOOTPOINT_BRACKET_DEG: f64 = 89.999;

/// Transverse Mercator projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransverseMercator {
    /// Ellipsoid semi-major axis (meters)
    pub a: f64,
    /// Ellipsoid eccentricity squared
    pub e2: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    /// Central meridian (degrees)
    pub central_meridian: f64,
    /// False easting (meters)
    pub false_easting: f64,
}

impl TransverseMercator {
    /// Create a projection from ellipsoid axis and inverse flattening.
    pub fn new(
        a: f64,
        inverse_flattening: f64,
        k0: f64,
        central_meridian: f64,
        false_easting: f64,
    ) -> Self {
        let f = 1.0 / inverse_flattening;
        Self {
            a,
            e2: 2.0 * f - f * f,
            k0,
            central_meridian,
            false_easting,
        }
    }

    /// TWD97 / TM2 zone 121 (EPSG:3826).
    ///
    /// GRS80 ellipsoid, k0 = 0.9999, central meridian 121°E,
    /// false easting 250 km.
    pub fn twd97_tm2() -> Self {
        Self::new(6378137.0, 298.257222101, 0.9999, 121.0, 250000.0)
    }

    /// Meridian arc length from the equator to latitude `phi` (radians).
    pub fn meridian_arc(&self, phi: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        self.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
    }

    /// Find the latitude (radians) whose meridian arc equals `northing` meters.
    ///
    /// Searches [-89.999°, 89.999°]. If the tolerance is not met within
    /// [`FOOTPOINT_MAX_ITERATIONS`] the last midpoint is returned.
    pub fn footpoint_latitude(&self, northing: f64) -> f64 {
        let bound = FOOTPOINT_BRACKET_DEG.to_radians();
        self.bisect_footpoint(-bound, bound, northing)
    }

    /// Bisection over an arbitrary bracket.
    ///
    /// The bracket is reordered so that `lo` always has the smaller arc length.
    fn bisect_footpoint(&self, a: f64, b: f64, northing: f64) -> f64 {
        let (mut lo, mut hi) = if self.meridian_arc(a) <= self.meridian_arc(b) {
            (a, b)
        } else {
            (b, a)
        };

        let mut mid = 0.5 * (lo + hi);
        for _ in 0..FOOTPOINT_MAX_ITERATIONS {
            mid = 0.5 * (lo + hi);
            let diff = self.meridian_arc(mid) - northing;

            if diff.abs() < FOOTPOINT_TOLERANCE_M {
                break;
            }
            if diff > 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        mid
    }

    /// Convert projected coordinates (meters) to geographic coordinates.
    ///
    /// # Arguments
    /// * `x` - Easting in meters, including false easting
    /// * `y` - Northing in meters
    pub fn inverse(&self, x: f64, y: f64) -> GeoPoint {
        let a = self.a;
        let e2 = self.e2;

        let xb = (x - self.false_easting) / self.k0;
        let yb = y / self.k0;

        let phi = self.footpoint_latitude(yb);

        let sin_phi = phi.sin();
        let t = phi.tan();
        let sec = 1.0 / phi.cos();
        let t2 = t * t;

        // Radii of curvature: meridian (R) and prime vertical (N)
        let w = 1.0 - e2 * sin_phi * sin_phi;
        let r = a * (1.0 - e2) / w.powf(1.5);
        let n = a / w.sqrt();

        let lat = phi - (xb * xb * t) / (2.0 * r * n)
            + xb.powi(4) / (24.0 * r * n.powi(3)) * (5.0 + 3.0 * t2) * t;

        let lng = xb * sec / n - xb.powi(3) / (6.0 * n.powi(3)) * sec * (n / r + 2.0 * t2)
            + xb.powi(5) / (120.0 * n.powi(5)) * sec * (5.0 + 28.0 * t2 + 24.0 * t2 * t2);

        GeoPoint {
            lat: lat * 180.0 / PI,
            lng: lng * 180.0 / PI + self.central_meridian,
        }
    }
}

impl Default for TransverseMercator {
    fn default() -> Self {
        Self::twd97_tm2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meridian_arc_zero_at_equator() {
        let tm = TransverseMercator::twd97_tm2();
        assert_eq!(tm.meridian_arc(0.0), 0.0);
    }

    #[test]
    fn test_meridian_arc_is_odd_and_increasing() {
        let tm = TransverseMercator::twd97_tm2();
        let phi = 25f64.to_radians();
        assert!((tm.meridian_arc(phi) + tm.meridian_arc(-phi)).abs() < 1e-6);

        let mut prev = tm.meridian_arc(-1.5);
        for step in 1..=30 {
            let arc = tm.meridian_arc(-1.5 + step as f64 * 0.1);
            assert!(arc > prev, "arc must increase with latitude");
            prev = arc;
        }
    }

    #[test]
    fn test_meridian_arc_one_degree_near_taiwan() {
        // One degree of latitude near 24°N is roughly 110.8 km on GRS80
        let tm = TransverseMercator::twd97_tm2();
        let d = tm.meridian_arc(24.5f64.to_radians()) - tm.meridian_arc(23.5f64.to_radians());
        assert!((d - 110_800.0).abs() < 200.0, "got {}", d);
    }

    #[test]
    fn test_footpoint_meets_tolerance() {
        let tm = TransverseMercator::twd97_tm2();
        for northing in [0.0, 2_400_000.0, 2_769_577.3, -1_000_000.0, 9_000_000.0] {
            let phi = tm.footpoint_latitude(northing);
            let residual = (tm.meridian_arc(phi) - northing).abs();
            assert!(
                residual < FOOTPOINT_TOLERANCE_M,
                "northing {} residual {}",
                northing,
                residual
            );
        }
    }

    #[test]
    fn test_footpoint_bracket_order_does_not_matter() {
        let tm = TransverseMercator::twd97_tm2();
        let bound = FOOTPOINT_BRACKET_DEG.to_radians();
        let forward = tm.bisect_footpoint(-bound, bound, 2_700_000.0);
        let reversed = tm.bisect_footpoint(bound, -bound, 2_700_000.0);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_footpoint_out_of_range_returns_best_effort() {
        // Beyond the pole: converges onto the upper bracket without panicking
        let tm = TransverseMercator::twd97_tm2();
        let phi = tm.footpoint_latitude(1.0e9);
        assert!(phi.is_finite());
        assert!((phi.to_degrees() - FOOTPOINT_BRACKET_DEG).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_on_central_meridian() {
        let tm = TransverseMercator::twd97_tm2();
        let p = tm.inverse(tm.false_easting, 0.0);
        assert!(p.lat.abs() < 1e-7, "lat {}", p.lat);
        assert!((p.lng - 121.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_east_of_meridian() {
        // ~54.9 km east of the central meridian at ~25°N is ~121.54°E
        let tm = TransverseMercator::twd97_tm2();
        let p = tm.inverse(304_862.06, 2_769_577.30);
        assert!((p.lat - 25.0333).abs() < 1e-3, "lat {}", p.lat);
        assert!((p.lng - 121.5437).abs() < 1e-3, "lng {}", p.lng);
    }
}
