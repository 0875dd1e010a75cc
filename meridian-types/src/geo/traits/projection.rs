use crate::error::ProjectionError;

/// Conversion between points of two coordinate spaces.
///
/// This is the generic point-level interface: it works with any point types and reports failures as `None`. Map
/// projections themselves are implemented through [`CoordinateProjection`] and can be used as a `Projection` with
/// [`PointProjection`](crate::geo::impls::projection::PointProjection).
pub trait Projection {
    /// Type of the input (unprojected) points.
    type InPoint;
    /// Type of the output (projected) points.
    type OutPoint;

    /// Projects the point. Returns `None` if the point cannot be projected.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Reverses the projection. Returns `None` if the point cannot be unprojected.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

/// Cartographic projection between geographic coordinates (longitude and latitude in degrees) and projected
/// coordinates (easting and northing, usually in meters).
///
/// Both directions are pure functions of the input and the immutable parameters fixed when the projection was
/// constructed, so a projection can be shared between threads and called concurrently.
pub trait CoordinateProjection {
    /// Projects `(lon, lat)` into `(x, y)`.
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError>;
    /// Converts `(x, y)` back into `(lon, lat)`.
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError>;
}

impl<T: CoordinateProjection + ?Sized> CoordinateProjection for Box<T> {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        (**self).forward(lon, lat)
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        (**self).inverse(x, y)
    }
}

impl<T: CoordinateProjection + ?Sized> CoordinateProjection for &T {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        (**self).forward(lon, lat)
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        (**self).inverse(x, y)
    }
}
