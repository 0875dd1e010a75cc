use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::geo::ellipsoid::Ellipsoid;
use crate::geo::impls::projection::{
    IdentityProjection, LambertConformalConic, LambertConformalConicParams, TransverseMercator,
    TransverseMercatorParams, WebMercator,
};
use crate::geo::traits::projection::CoordinateProjection;

/// Coordinate reference system: the ellipsoid and the projection used to obtain planar coordinates from
/// geographic ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    ellipsoid: Ellipsoid,
    projection_type: ProjectionType,
}

/// Projection method of a [`Crs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ProjectionType {
    /// Geographic coordinate system, coordinates are longitude and latitude.
    None,
    /// Spherical Mercator of web maps.
    WebMercator,
    /// Lambert Conformal Conic with two standard parallels.
    LambertConformalConic(LambertConformalConicParams),
    /// Transverse Mercator.
    TransverseMercator(TransverseMercatorParams),
    /// Projection given by a `geodesy` operator definition.
    Other(String),
}

impl Crs {
    /// Web Mercator on WGS84.
    pub const EPSG3857: Crs = Crs {
        ellipsoid: Ellipsoid::WGS84,
        projection_type: ProjectionType::WebMercator,
    };

    /// Geographic coordinates on WGS84.
    pub const WGS84: Crs = Crs {
        ellipsoid: Ellipsoid::WGS84,
        projection_type: ProjectionType::None,
    };

    /// Creates a new coordinate system.
    pub fn new(ellipsoid: Ellipsoid, projection_type: ProjectionType) -> Self {
        Self {
            ellipsoid,
            projection_type,
        }
    }

    /// UTM zone on WGS84.
    pub fn utm(zone: u8, north: bool) -> Result<Self, ProjectionError> {
        let params = TransverseMercatorParams::utm(Ellipsoid::WGS84, zone, north)?;
        Ok(Self::new(Ellipsoid::WGS84, ProjectionType::TransverseMercator(params)))
    }

    /// Coordinate system with the given EPSG code.
    ///
    /// Known codes are 4326, 3857, 2154 (RGF93 / Lambert-93) and the WGS84 UTM zones (32601-32660, 32701-32760).
    pub fn from_epsg(code: u32) -> Result<Self, ProjectionError> {
        match code {
            4326 => Ok(Self::WGS84),
            3857 => Ok(Self::EPSG3857),
            2154 => Ok(Self::new(
                Ellipsoid::GRS80,
                ProjectionType::LambertConformalConic(
                    LambertConformalConicParams::new(Ellipsoid::GRS80, 3.0, 46.5, 49.0, 44.0)
                        .with_false_origin(700_000.0, 6_600_000.0),
                ),
            )),
            32601..=32660 => Self::utm((code - 32600) as u8, true),
            32701..=32760 => Self::utm((code - 32700) as u8, false),
            _ => Err(ProjectionError::Unsupported(format!("EPSG:{code}"))),
        }
    }

    /// Ellipsoid of the coordinate system.
    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    /// Projection method of the coordinate system.
    pub fn projection_type(&self) -> &ProjectionType {
        &self.projection_type
    }

    /// Returns true if the coordinates of the system are longitude and latitude.
    pub fn is_geographic(&self) -> bool {
        self.projection_type == ProjectionType::None
    }

    /// Builds the projection of the coordinate system.
    ///
    /// Projection parameters without an ellipsoid use the ellipsoid of the coordinate system.
    pub fn get_projection(&self) -> Result<Box<dyn CoordinateProjection>, ProjectionError> {
        match &self.projection_type {
            ProjectionType::None => Ok(Box::new(IdentityProjection)),
            ProjectionType::WebMercator => Ok(Box::new(WebMercator::new(self.ellipsoid))),
            ProjectionType::LambertConformalConic(params) => {
                let mut params = *params;
                params.ellipsoid.get_or_insert(self.ellipsoid);
                Ok(Box::new(LambertConformalConic::new(params)?))
            }
            ProjectionType::TransverseMercator(params) => {
                let mut params = *params;
                params.ellipsoid.get_or_insert(self.ellipsoid);
                Ok(Box::new(TransverseMercator::new(params)?))
            }
            ProjectionType::Other(definition) => Self::other_projection(definition),
        }
    }

    #[cfg(feature = "geodesy")]
    fn other_projection(
        definition: &str,
    ) -> Result<Box<dyn CoordinateProjection>, ProjectionError> {
        Ok(Box::new(
            crate::geo::impls::projection::GeodesyProjection::new(definition)?,
        ))
    }

    #[cfg(not(feature = "geodesy"))]
    fn other_projection(
        definition: &str,
    ) -> Result<Box<dyn CoordinateProjection>, ProjectionError> {
        Err(ProjectionError::Unsupported(definition.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn epsg_codes() {
        assert!(Crs::from_epsg(4326).unwrap().is_geographic());
        assert_eq!(Crs::from_epsg(3857).unwrap(), Crs::EPSG3857);
        assert_eq!(Crs::from_epsg(32633).unwrap(), Crs::utm(33, true).unwrap());
        assert_eq!(Crs::from_epsg(32721).unwrap(), Crs::utm(21, false).unwrap());
        assert_matches!(Crs::from_epsg(27700), Err(ProjectionError::Unsupported(_)));
        assert_matches!(Crs::utm(0, true), Err(ProjectionError::InvalidParameters(_)));
    }

    #[test]
    fn lambert_93_origin() {
        let projection = Crs::from_epsg(2154).unwrap().get_projection().unwrap();
        let (x, y) = projection.forward(3.0, 46.5).unwrap();
        assert_abs_diff_eq!(x, 700_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y, 6_600_000.0, epsilon = 1e-6);
    }

    #[test]
    fn params_inherit_ellipsoid() {
        let crs = Crs::new(
            Ellipsoid::CLARKE_1866,
            ProjectionType::TransverseMercator(TransverseMercatorParams {
                central_meridian: -75.0,
                scale_factor: 0.9996,
                ..Default::default()
            }),
        );

        let (x, y) = crs.get_projection().unwrap().forward(-73.5, 40.5).unwrap();
        assert_abs_diff_eq!(x, 127_106.5, epsilon = 0.1);
        assert_abs_diff_eq!(y, 4_484_124.4, epsilon = 0.1);
    }

    #[test]
    fn web_mercator_projection() {
        let projection = Crs::EPSG3857.get_projection().unwrap();
        let (x, y) = projection.forward(0.0, 0.0).unwrap();
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn serialization() {
        let crs = Crs::utm(32, true).unwrap();
        let json = serde_json::to_string(&crs).unwrap();
        let deserialized: Crs = serde_json::from_str(&json).unwrap();
        assert_eq!(crs, deserialized);

        let json = r#"{
            "ellipsoid": {"semimajor": 6378137.0, "inv_flattening": 298.257223563},
            "projection_type": "none"
        }"#;
        let geographic: Crs = serde_json::from_str(json).unwrap();
        assert!(geographic.is_geographic());
    }
}
