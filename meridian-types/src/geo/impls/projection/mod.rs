//! Implementations of the supported map projections.

use std::f64::consts::{PI, TAU};

use crate::error::ProjectionError;
use crate::geo::ellipsoid::Ellipsoid;

mod adapter;
mod identity;
mod lambert;
mod transverse_mercator;
mod web_mercator;

pub use adapter::PointProjection;
pub use identity::IdentityProjection;
pub use lambert::{LambertConformalConic, LambertConformalConicParams};
pub use transverse_mercator::{TransverseMercator, TransverseMercatorParams};
pub use web_mercator::WebMercator;

#[cfg(feature = "geodesy")]
mod geodesy;
#[cfg(feature = "geodesy")]
pub use geodesy::GeodesyProjection;

/// Wraps longitude in radians into `[-PI, PI]`.
pub(crate) fn adjust_lon(lon: f64) -> f64 {
    if lon.abs() <= PI {
        lon
    } else {
        lon - TAU * ((lon + PI) / TAU).floor()
    }
}

pub(crate) fn check_finite(name: &str, value: f64) -> Result<(), ProjectionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::InvalidParameters(format!(
            "{name} must be a finite number, got {value}"
        )))
    }
}

pub(crate) fn check_latitude(name: &str, value: f64) -> Result<(), ProjectionError> {
    check_finite(name, value)?;
    if value.abs() > 90.0 {
        return Err(ProjectionError::InvalidParameters(format!(
            "{name} must be within [-90, 90], got {value}"
        )));
    }

    Ok(())
}

pub(crate) fn require_ellipsoid(
    ellipsoid: Option<Ellipsoid>,
) -> Result<Ellipsoid, ProjectionError> {
    let ellipsoid = ellipsoid.ok_or_else(|| {
        ProjectionError::InvalidParameters("ellipsoid is not specified".to_string())
    })?;
    ellipsoid.validate()?;
    Ok(ellipsoid)
}
