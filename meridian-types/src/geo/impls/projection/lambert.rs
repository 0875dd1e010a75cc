use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::geo::ellipsoid::Ellipsoid;
use crate::geo::impls::projection::{adjust_lon, check_finite, check_latitude, require_ellipsoid};
use crate::geo::traits::projection::CoordinateProjection;

/// Convergence threshold of the inverse latitude iteration, in radians.
const LAT_TOLERANCE: f64 = 1e-11;
const MAX_ITERATIONS: usize = 15;

/// Parameters of a [`LambertConformalConic`] projection. Angles are in degrees, distances in meters.
///
/// Usually populated from coordinate system metadata. All the parameters are checked when the projection is
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LambertConformalConicParams {
    /// Reference ellipsoid. Required.
    pub ellipsoid: Option<Ellipsoid>,
    /// Longitude of the projection origin.
    pub central_meridian: f64,
    /// Latitude of the projection origin.
    pub latitude_of_origin: f64,
    /// First standard parallel.
    pub standard_parallel_1: f64,
    /// Second standard parallel.
    pub standard_parallel_2: f64,
    /// Scale factor applied to the whole projection.
    pub scale_factor: f64,
    /// Easting of the projection origin.
    pub false_easting: f64,
    /// Northing of the projection origin.
    pub false_northing: f64,
}

impl Default for LambertConformalConicParams {
    fn default() -> Self {
        Self {
            ellipsoid: None,
            central_meridian: 0.0,
            latitude_of_origin: 0.0,
            standard_parallel_1: 0.0,
            standard_parallel_2: 0.0,
            scale_factor: 1.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }
}

impl LambertConformalConicParams {
    /// Creates parameters with the given ellipsoid, origin and standard parallels.
    pub fn new(
        ellipsoid: Ellipsoid,
        central_meridian: f64,
        latitude_of_origin: f64,
        standard_parallel_1: f64,
        standard_parallel_2: f64,
    ) -> Self {
        Self {
            ellipsoid: Some(ellipsoid),
            central_meridian,
            latitude_of_origin,
            standard_parallel_1,
            standard_parallel_2,
            ..Default::default()
        }
    }

    /// Sets false easting and northing.
    pub fn with_false_origin(mut self, false_easting: f64, false_northing: f64) -> Self {
        self.false_easting = false_easting;
        self.false_northing = false_northing;
        self
    }

    /// Sets the scale factor.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }
}

/// Lambert Conformal Conic projection with two standard parallels (EPSG method 9802).
///
/// Cone constant, scale constant and the radius at the origin latitude are computed once when the projection is
/// constructed. The inverse projection solves for latitude with a fixed-point iteration; failure to converge is
/// reported as [`ProjectionError::NonConvergence`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertConformalConic {
    params: LambertConformalConicParams,
    e: f64,
    lon0: f64,
    /// Cone constant.
    n: f64,
    /// `a * k0 * F`
    af: f64,
    rho0: f64,
}

/// `m` function of the conformal latitude: `cos φ / sqrt(1 - e² sin² φ)`.
fn msfn(phi: f64, e: f64) -> f64 {
    let sin_phi = phi.sin();
    phi.cos() / (1.0 - e * e * sin_phi * sin_phi).sqrt()
}

/// `t` function of the isometric latitude: `tan(π/4 - φ/2) / ((1 - e sin φ) / (1 + e sin φ))^(e/2)`.
fn tsfn(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

impl LambertConformalConic {
    /// Creates a new projection, validating the parameters.
    pub fn new(params: LambertConformalConicParams) -> Result<Self, ProjectionError> {
        let ellipsoid = require_ellipsoid(params.ellipsoid)?;

        check_finite("central meridian", params.central_meridian)?;
        check_latitude("latitude of origin", params.latitude_of_origin)?;
        check_latitude("standard parallel 1", params.standard_parallel_1)?;
        check_latitude("standard parallel 2", params.standard_parallel_2)?;
        check_finite("false easting", params.false_easting)?;
        check_finite("false northing", params.false_northing)?;
        if !params.scale_factor.is_finite() || params.scale_factor <= 0.0 {
            return Err(ProjectionError::InvalidParameters(format!(
                "scale factor must be positive, got {}",
                params.scale_factor
            )));
        }

        for parallel in [params.standard_parallel_1, params.standard_parallel_2] {
            if (parallel.abs() - 90.0).abs() < 1e-10 {
                return Err(ProjectionError::InvalidParameters(
                    "standard parallel cannot be at a pole".into(),
                ));
            }
        }

        if (params.standard_parallel_1 - params.standard_parallel_2).abs() < 1e-10 {
            return Err(ProjectionError::InvalidParameters(
                "standard parallels must differ to define the cone constant".into(),
            ));
        }

        let e = ellipsoid.eccentricity();
        let phi1 = params.standard_parallel_1.to_radians();
        let phi2 = params.standard_parallel_2.to_radians();
        let phi0 = params.latitude_of_origin.to_radians();

        let m1 = msfn(phi1, e);
        let m2 = msfn(phi2, e);
        let t1 = tsfn(phi1, e);
        let t2 = tsfn(phi2, e);
        let t0 = tsfn(phi0, e);

        let n = (m1.ln() - m2.ln()) / (t1.ln() - t2.ln());
        if !n.is_finite() || n.abs() < 1e-10 {
            return Err(ProjectionError::InvalidParameters(format!(
                "cone constant is undefined for standard parallels {} and {}",
                params.standard_parallel_1, params.standard_parallel_2
            )));
        }

        let f = m1 / (n * t1.powf(n));
        let af = ellipsoid.semimajor() * params.scale_factor * f;
        let rho0 = af * t0.powf(n);
        if !rho0.is_finite() {
            return Err(ProjectionError::InvalidParameters(
                "latitude of origin is at the apex-opposite pole of the cone".into(),
            ));
        }

        Ok(Self {
            params,
            e,
            lon0: params.central_meridian.to_radians(),
            n,
            af,
            rho0,
        })
    }

    /// Parameters the projection was created with.
    pub fn params(&self) -> &LambertConformalConicParams {
        &self.params
    }

    /// Cone constant `n`.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    fn latitude_from_t(&self, t: f64) -> Result<f64, ProjectionError> {
        let e = self.e;
        let mut phi = FRAC_PI_2 - 2.0 * t.atan();

        for _ in 0..MAX_ITERATIONS {
            let es = e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(e / 2.0)).atan();
            if !next.is_finite() {
                break;
            }

            let delta = (next - phi).abs();
            phi = next;
            if delta <= LAT_TOLERANCE {
                return Ok(phi);
            }
        }

        log::warn!("Lambert conformal conic inverse did not converge for t = {t}");
        Err(ProjectionError::NonConvergence {
            iterations: MAX_ITERATIONS,
        })
    }
}

impl CoordinateProjection for LambertConformalConic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
            return Err(ProjectionError::OutOfDomain);
        }

        let phi = lat.to_radians();
        let rho = if (lat.abs() - 90.0).abs() < 1e-12 {
            // The apex of the cone maps into a point, the opposite pole to infinity.
            if lat * self.n > 0.0 {
                0.0
            } else {
                return Err(ProjectionError::OutOfDomain);
            }
        } else {
            self.af * tsfn(phi, self.e).powf(self.n)
        };

        let theta = self.n * adjust_lon(lon.to_radians() - self.lon0);
        let x = self.params.false_easting + rho * theta.sin();
        let y = self.params.false_northing + self.rho0 - rho * theta.cos();

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

        let mut dx = x - self.params.false_easting;
        let mut dy = self.rho0 - (y - self.params.false_northing);
        if self.n < 0.0 {
            dx = -dx;
            dy = -dy;
        }

        let rho = self.n.signum() * dx.hypot(dy);
        if rho == 0.0 {
            let lat = if self.n > 0.0 { 90.0 } else { -90.0 };
            return Ok((self.params.central_meridian, lat));
        }

        let theta = dx.atan2(dy);
        let t = (rho / self.af).powf(1.0 / self.n);
        let phi = self.latitude_from_t(t)?;
        let lon = adjust_lon(theta / self.n + self.lon0);

        Ok((lon.to_degrees(), phi.to_degrees()))
    }
}
