use meridian_types::cartesian::{CartesianPoint2d, Point2};
use serde::{Deserialize, Serialize};

/// Precision of the computed coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrecisionModel {
    /// Full `f64` precision, coordinates are not rounded.
    #[default]
    Floating,
    /// Coordinates are rounded to the grid with the step of `1 / scale`. For example, scale of `1000` keeps
    /// three decimal digits.
    Fixed {
        /// Number of grid cells per coordinate unit. Must be positive.
        scale: f64,
    },
}

impl PrecisionModel {
    /// Fixed precision model with the given scale.
    pub fn fixed(scale: f64) -> Self {
        Self::Fixed { scale }
    }

    /// Returns true if the model rounds coordinates.
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    /// Rounds the value to the precision of the model. Halves are rounded up.
    ///
    /// A fixed model with a scale that is not a positive finite number leaves the value unchanged.
    pub fn make_precise_value(&self, value: f64) -> f64 {
        match *self {
            Self::Fixed { scale } if scale.is_finite() && scale > 0.0 => {
                (value * scale + 0.5).floor() / scale
            }
            _ => value,
        }
    }

    /// Rounds both coordinates of the point.
    pub fn make_precise(&self, point: Point2) -> Point2 {
        Point2::new(
            self.make_precise_value(point.x()),
            self.make_precise_value(point.y()),
        )
    }
}
