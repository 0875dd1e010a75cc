use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::ProjectionError;
use crate::geo::ellipsoid::Ellipsoid;
use crate::geo::traits::projection::CoordinateProjection;

/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Spherical ("pseudo") Mercator used by web maps (EPSG:3857). Uses the semimajor axis of the ellipsoid as the
/// sphere radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WebMercator {
    ellipsoid: Ellipsoid,
}

impl WebMercator {
    /// Creates a new projection on the given ellipsoid.
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self { ellipsoid }
    }

    /// Ellipsoid of the projection.
    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(Ellipsoid::WGS84)
    }
}

impl CoordinateProjection for WebMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        if lat.abs() >= 90.0 {
            return Err(ProjectionError::OutOfDomain);
        }

        let a = self.ellipsoid.semimajor();
        let x = a * lon.to_radians();
        let y = a * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();

        if x.is_finite() && y.is_finite() {
            Ok((x, y))
        } else {
            Err(ProjectionError::OutOfDomain)
        }
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::OutOfDomain);
        }

        let a = self.ellipsoid.semimajor();
        let lat = FRAC_PI_2 - 2.0 * (-y / a).exp().atan();
        let lon = x / a;

        Ok((lon.to_degrees(), lat.to_degrees()))
    }
}
