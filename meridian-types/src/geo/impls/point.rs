use serde::{Deserialize, Serialize};

use crate::geo::traits::point::{GeoPoint, NewGeoPoint};

/// Geographic point with longitude and latitude in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct GeoPoint2d {
    lon: f64,
    lat: f64,
}

impl GeoPoint2d {
    /// Creates a new point from longitude and latitude in degrees.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Copies coordinates of any other geographic point.
    pub fn from_point(other: &impl GeoPoint<Num = f64>) -> Self {
        Self::new(other.lon(), other.lat())
    }

    /// Returns true if both coordinates are finite and the latitude is in `[-90, 90]` range.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite() && (-90.0..=90.0).contains(&self.lat)
    }
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint2d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self::new(lon, lat)
    }
}
