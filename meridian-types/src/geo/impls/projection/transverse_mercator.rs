use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::geo::ellipsoid::Ellipsoid;
use crate::geo::impls::projection::{adjust_lon, check_finite, check_latitude, require_ellipsoid};
use crate::geo::traits::projection::CoordinateProjection;

/// Residual (in meters) below which the inverse refinement stops.
const RESIDUAL_TOLERANCE: f64 = 1e-6;
const MAX_REFINEMENTS: usize = 6;
/// Step (in radians) of the numerical derivatives used by the inverse refinement.
const DERIVATIVE_STEP: f64 = 1e-7;

/// Parameters of a [`TransverseMercator`] projection. Angles are in degrees, distances in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransverseMercatorParams {
    /// Reference ellipsoid. Required.
    pub ellipsoid: Option<Ellipsoid>,
    /// Longitude of the projection origin.
    pub central_meridian: f64,
    /// Latitude of the projection origin.
    pub latitude_of_origin: f64,
    /// Scale factor on the central meridian.
    pub scale_factor: f64,
    /// Easting of the projection origin.
    pub false_easting: f64,
    /// Northing of the projection origin.
    pub false_northing: f64,
}

impl Default for TransverseMercatorParams {
    fn default() -> Self {
        Self {
            ellipsoid: None,
            central_meridian: 0.0,
            latitude_of_origin: 0.0,
            scale_factor: 1.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }
}

impl TransverseMercatorParams {
    /// Creates parameters with the given ellipsoid, origin and scale factor.
    pub fn new(
        ellipsoid: Ellipsoid,
        central_meridian: f64,
        latitude_of_origin: f64,
        scale_factor: f64,
    ) -> Self {
        Self {
            ellipsoid: Some(ellipsoid),
            central_meridian,
            latitude_of_origin,
            scale_factor,
            ..Default::default()
        }
    }

    /// Parameters of a UTM zone on the given ellipsoid. Zones are numbered from 1 to 60.
    pub fn utm(ellipsoid: Ellipsoid, zone: u8, north: bool) -> Result<Self, ProjectionError> {
        if !(1..=60).contains(&zone) {
            return Err(ProjectionError::InvalidParameters(format!(
                "UTM zone must be within [1, 60], got {zone}"
            )));
        }

        let false_northing = if north { 0.0 } else { 10_000_000.0 };
        Ok(Self::new(ellipsoid, zone as f64 * 6.0 - 183.0, 0.0, 0.9996)
            .with_false_origin(500_000.0, false_northing))
    }

    /// Sets false easting and northing.
    pub fn with_false_origin(mut self, false_easting: f64, false_northing: f64) -> Self {
        self.false_easting = false_easting;
        self.false_northing = false_northing;
        self
    }
}

/// Transverse Mercator projection in the series form of USGS Professional Paper 1395 (Snyder, 1987).
///
/// The series is accurate within a few degrees of the central meridian (a UTM zone is 6° wide). Coefficients of
/// the meridian distance series and the meridian distance of the origin latitude are computed once on
/// construction.
///
/// The inverse evaluates the inverse series and then polishes the result with Newton steps against the forward
/// series, so that `inverse(forward(p))` reproduces `p` to well below a micrometer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    params: TransverseMercatorParams,
    a: f64,
    k0: f64,
    lon0: f64,
    /// First eccentricity squared.
    es: f64,
    /// Second eccentricity squared.
    ep2: f64,
    /// Meridian distance series coefficients.
    en: [f64; 4],
    /// Footpoint latitude series coefficients.
    fp: [f64; 4],
    /// Meridian distance of the latitude of origin.
    ml0: f64,
}

impl TransverseMercator {
    /// Creates a new projection, validating the parameters.
    pub fn new(params: TransverseMercatorParams) -> Result<Self, ProjectionError> {
        let ellipsoid = require_ellipsoid(params.ellipsoid)?;

        check_finite("central meridian", params.central_meridian)?;
        check_latitude("latitude of origin", params.latitude_of_origin)?;
        check_finite("false easting", params.false_easting)?;
        check_finite("false northing", params.false_northing)?;
        if !params.scale_factor.is_finite() || params.scale_factor <= 0.0 {
            return Err(ProjectionError::InvalidParameters(format!(
                "scale factor must be positive, got {}",
                params.scale_factor
            )));
        }

        let es = ellipsoid.eccentricity_sq();
        let es2 = es * es;
        let es3 = es2 * es;
        let en = [
            1.0 - es / 4.0 - 3.0 * es2 / 64.0 - 5.0 * es3 / 256.0,
            3.0 * es / 8.0 + 3.0 * es2 / 32.0 + 45.0 * es3 / 1024.0,
            15.0 * es2 / 256.0 + 45.0 * es3 / 1024.0,
            35.0 * es3 / 3072.0,
        ];

        let sqrt_one_minus_es = (1.0 - es).sqrt();
        let e1 = (1.0 - sqrt_one_minus_es) / (1.0 + sqrt_one_minus_es);
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_3 * e1;
        let fp = [
            3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0,
            21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0,
            151.0 * e1_3 / 96.0,
            1097.0 * e1_4 / 512.0,
        ];

        let mut projection = Self {
            params,
            a: ellipsoid.semimajor(),
            k0: params.scale_factor,
            lon0: params.central_meridian.to_radians(),
            es,
            ep2: ellipsoid.second_eccentricity_sq(),
            en,
            fp,
            ml0: 0.0,
        };
        projection.ml0 = projection.meridian_distance(params.latitude_of_origin.to_radians());

        Ok(projection)
    }

    /// Parameters the projection was created with.
    pub fn params(&self) -> &TransverseMercatorParams {
        &self.params
    }

    /// Distance along the meridian from the equator to the given latitude.
    pub fn meridian_distance(&self, phi: f64) -> f64 {
        let [c0, c1, c2, c3] = self.en;
        self.a
            * (c0 * phi - c1 * (2.0 * phi).sin() + c2 * (4.0 * phi).sin()
                - c3 * (6.0 * phi).sin())
    }

    /// Latitude at which the meridian distance is `m`.
    fn footpoint_latitude(&self, m: f64) -> f64 {
        let mu = m / (self.a * self.en[0]);
        let [f1, f2, f3, f4] = self.fp;
        let mut phi = mu
            + f1 * (2.0 * mu).sin()
            + f2 * (4.0 * mu).sin()
            + f3 * (6.0 * mu).sin()
            + f4 * (8.0 * mu).sin();

        // The series above inverts the full meridian arc, the forward uses a truncated one. Two Newton steps make
        // the footpoint consistent with `meridian_distance`.
        for _ in 0..2 {
            let sin_phi = phi.sin();
            let w = 1.0 - self.es * sin_phi * sin_phi;
            let meridian_radius = self.a * (1.0 - self.es) / (w * w.sqrt());
            phi -= (self.meridian_distance(phi) - m) / meridian_radius;
        }

        phi
    }

    /// Forward series in radians, without false origin.
    fn forward_rad(&self, phi: f64, dlam: f64) -> (f64, f64) {
        let sin_phi = phi.sin();
        let cos_phi = phi.cos();
        let tan_phi = phi.tan();

        let n = self.a / (1.0 - self.es * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = self.ep2 * cos_phi * cos_phi;
        let a = dlam * cos_phi;
        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;
        let m = self.meridian_distance(phi);

        let x = self.k0
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a5 / 120.0);
        let y = self.k0
            * (m - self.ml0
                + n * tan_phi
                    * (a2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * a6
                            / 720.0));

        (x, y)
    }

    /// Inverse series in radians, without false origin. Returns `(phi, dlam)`.
    fn inverse_rad(&self, x: f64, y: f64) -> (f64, f64) {
        let phi1 = self.footpoint_latitude(self.ml0 + y / self.k0);
        if FRAC_PI_2 - phi1.abs() < 1e-12 {
            return (phi1.signum() * FRAC_PI_2, 0.0);
        }

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let w = 1.0 - self.es * sin_phi1 * sin_phi1;
        let c1 = self.ep2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let n1 = self.a / w.sqrt();
        let r1 = self.a * (1.0 - self.es) / (w * w.sqrt());
        let d = x / (n1 * self.k0);
        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let phi = phi1
            - (n1 * tan_phi1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * self.ep2
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);
        let dlam = (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2 + 24.0 * t1 * t1) * d5
                / 120.0)
            / cos_phi1;

        (phi, dlam)
    }

    /// Newton refinement of `(phi, dlam)` so that the forward series maps it to `(x, y)`.
    fn refine(&self, x: f64, y: f64, mut phi: f64, mut dlam: f64) -> (f64, f64) {
        let h = DERIVATIVE_STEP;
        for _ in 0..MAX_REFINEMENTS {
            let (fx, fy) = self.forward_rad(phi, dlam);
            let rx = x - fx;
            let ry = y - fy;
            if rx.abs() < RESIDUAL_TOLERANCE && ry.abs() < RESIDUAL_TOLERANCE {
                break;
            }

            let (x_pn, y_pn) = self.forward_rad(phi + h, dlam);
            let (x_ps, y_ps) = self.forward_rad(phi - h, dlam);
            let (x_le, y_le) = self.forward_rad(phi, dlam + h);
            let (x_lw, y_lw) = self.forward_rad(phi, dlam - h);

            let j11 = (x_pn - x_ps) / (2.0 * h);
            let j21 = (y_pn - y_ps) / (2.0 * h);
            let j12 = (x_le - x_lw) / (2.0 * h);
            let j22 = (y_le - y_lw) / (2.0 * h);

            let det = j11 * j22 - j12 * j21;
            if !det.is_finite() || det.abs() < f64::EPSILON {
                break;
            }

            let d_phi = (rx * j22 - j12 * ry) / det;
            let d_lam = (j11 * ry - j21 * rx) / det;
            if !d_phi.is_finite() || !d_lam.is_finite() {
                break;
            }

            phi += d_phi;
            dlam += d_lam;
        }

        (phi, dlam)
    }
}

impl CoordinateProjection for TransverseMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
            return Err(ProjectionError::OutOfDomain);
        }

        let dlam = adjust_lon(lon.to_radians() - self.lon0);
        if dlam.abs() >= FRAC_PI_2 {
            return Err(ProjectionError::OutOfDomain);
        }

        let (x, y) = self.forward_rad(lat.to_radians(), dlam);
        let x = x + self.params.false_easting;
        let y = y + self.params.false_northing;

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

        let x = x - self.params.false_easting;
        let y = y - self.params.false_northing;

        let (phi, dlam) = self.inverse_rad(x, y);
        if FRAC_PI_2 - phi.abs() < 1e-12 {
            return Ok((self.params.central_meridian, phi.to_degrees()));
        }

        let (phi, dlam) = self.refine(x, y, phi, dlam);
        if !phi.is_finite() || !dlam.is_finite() {
            return Err(ProjectionError::OutOfDomain);
        }

        let lon = adjust_lon(dlam + self.lon0);
        Ok((lon.to_degrees(), phi.to_degrees()))
    }
}
