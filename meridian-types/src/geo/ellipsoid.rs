use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Reference ellipsoid of a geodetic datum.
///
/// Defined by the semi-major axis (in meters) and the inverse flattening. Inverse flattening of `0` describes a
/// sphere, following the convention of EPSG and WKT metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    semimajor: f64,
    inv_flattening: f64,
}

impl Ellipsoid {
    /// WGS 84 (EPSG:7030).
    pub const WGS84: Self = Ellipsoid {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// GRS 1980 (EPSG:7019).
    pub const GRS80: Self = Ellipsoid {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257222101,
    };

    /// Clarke 1866 (EPSG:7008).
    pub const CLARKE_1866: Self = Ellipsoid {
        semimajor: 6_378_206.4,
        inv_flattening: 294.978_698_213_898,
    };

    /// International 1924 (EPSG:7022).
    pub const INTERNATIONAL_1924: Self = Ellipsoid {
        semimajor: 6_378_388.0,
        inv_flattening: 297.0,
    };

    /// Authalic sphere of GRS 1980 (EPSG:7048).
    pub const SPHERE: Self = Ellipsoid {
        semimajor: 6_371_007.0,
        inv_flattening: 0.0,
    };

    /// Creates a new ellipsoid, validating its parameters.
    pub fn new(semimajor: f64, inv_flattening: f64) -> Result<Self, ProjectionError> {
        let ellipsoid = Self {
            semimajor,
            inv_flattening,
        };
        ellipsoid.validate()?;

        Ok(ellipsoid)
    }

    /// Creates a sphere with the given radius.
    pub fn sphere(radius: f64) -> Result<Self, ProjectionError> {
        Self::new(radius, 0.0)
    }

    /// Checks that the parameters describe a real ellipsoid.
    ///
    /// Ellipsoids deserialized from external metadata are not validated until they are used to construct a
    /// projection, which calls this method.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if !self.semimajor.is_finite() || self.semimajor <= 0.0 {
            return Err(ProjectionError::InvalidParameters(format!(
                "semi-major axis must be a positive number, got {}",
                self.semimajor
            )));
        }

        if !self.inv_flattening.is_finite()
            || (self.inv_flattening != 0.0 && self.inv_flattening <= 1.0)
        {
            return Err(ProjectionError::InvalidParameters(format!(
                "inverse flattening must be 0 or greater than 1, got {}",
                self.inv_flattening
            )));
        }

        Ok(())
    }

    /// Semi-major axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening, `0` for a sphere.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Returns true if the ellipsoid is a sphere.
    pub fn is_sphere(&self) -> bool {
        self.inv_flattening == 0.0
    }

    /// Flattening `(a - b) / a`.
    pub fn flattening(&self) -> f64 {
        if self.is_sphere() {
            0.0
        } else {
            1.0 / self.inv_flattening
        }
    }

    /// Semi-minor axis in meters.
    pub fn semiminor(&self) -> f64 {
        self.semimajor * (1.0 - self.flattening())
    }

    /// Square of the first eccentricity.
    pub fn eccentricity_sq(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// First eccentricity.
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_sq().sqrt()
    }

    /// Square of the second eccentricity `e² / (1 - e²)`.
    pub fn second_eccentricity_sq(&self) -> f64 {
        let es = self.eccentricity_sq();
        es / (1.0 - es)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}
