use geodesy::prelude::*;

use crate::error::ProjectionError;
use crate::geo::traits::projection::CoordinateProjection;

/// Projection defined by a [geodesy](https://docs.rs/geodesy) operator definition, e.g. `"utm zone=32"`.
///
/// Allows using any projection supported by the `geodesy` crate, including the ones that do not have a native
/// implementation in this crate.
pub struct GeodesyProjection {
    context: Minimal,
    op: OpHandle,
}

impl GeodesyProjection {
    /// Creates the projection from the operator definition.
    pub fn new(definition: &str) -> Result<Self, ProjectionError> {
        let mut context = Minimal::new();
        let op = context
            .op(definition)
            .map_err(|err| ProjectionError::InvalidParameters(err.to_string()))?;
        Ok(Self { context, op })
    }
}

impl std::fmt::Debug for GeodesyProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeodesyProjection").finish_non_exhaustive()
    }
}

impl CoordinateProjection for GeodesyProjection {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        let mut data = [Coor2D::geo(lat, lon)];
        self.context
            .apply(self.op, Fwd, &mut data)
            .map_err(|_| ProjectionError::OutOfDomain)?;

        let [x, y] = data[0].0;
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::OutOfDomain);
        }

        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let mut data = [Coor2D([x, y])];
        self.context
            .apply(self.op, Inv, &mut data)
            .map_err(|_| ProjectionError::OutOfDomain)?;

        let [lon, lat] = data[0].0;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::OutOfDomain);
        }

        Ok((lon.to_degrees(), lat.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::impls::projection::{TransverseMercator, TransverseMercatorParams};
    use crate::geo::Ellipsoid;
    use approx::assert_abs_diff_eq;

    #[test]
    fn matches_native_transverse_mercator() {
        let geodesy = GeodesyProjection::new("utm zone=32").unwrap();
        let params = TransverseMercatorParams::utm(Ellipsoid::GRS80, 32, true).unwrap();
        let native = TransverseMercator::new(params).unwrap();

        for (lon, lat) in [(9.0, 48.0), (10.0, 50.0), (8.2, 55.5)] {
            let (x1, y1) = geodesy.forward(lon, lat).unwrap();
            let (x2, y2) = native.forward(lon, lat).unwrap();
            assert_abs_diff_eq!(x1, x2, epsilon = 0.01);
            assert_abs_diff_eq!(y1, y2, epsilon = 0.01);
        }
    }

    #[test]
    fn invalid_definition() {
        assert!(GeodesyProjection::new("no_such_operator").is_err());
    }
}
