use crate::error::ProjectionError;
use crate::geo::traits::projection::CoordinateProjection;

/// Projection of geographic coordinate systems: longitude and latitude are used as `x` and `y` as is.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct IdentityProjection;

impl CoordinateProjection for IdentityProjection {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        if lon.is_finite() && lat.is_finite() && lat.abs() <= 90.0 {
            Ok((lon, lat))
        } else {
            Err(ProjectionError::OutOfDomain)
        }
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        self.forward(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_coordinates_through() {
        assert_eq!(IdentityProjection.forward(12.5, -41.0), Ok((12.5, -41.0)));
        assert_eq!(IdentityProjection.inverse(12.5, -41.0), Ok((12.5, -41.0)));
        assert_eq!(
            IdentityProjection.forward(0.0, 91.0),
            Err(ProjectionError::OutOfDomain)
        );
    }
}
