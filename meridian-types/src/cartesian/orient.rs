use crate::cartesian::robust::orientation_index;
use crate::cartesian::CartesianPoint2d;
use serde::{Deserialize, Serialize};

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// Collinear
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points.
    ///
    /// The determinant is evaluated directly in the point's numeric type. For integer coordinates this is exact,
    /// for floating point coordinates use [`Orientation::robust`] instead.
    pub fn triplet<Num: num_traits::Num + PartialOrd>(
        p: &impl CartesianPoint2d<Num = Num>,
        q: &impl CartesianPoint2d<Num = Num>,
        r: &impl CartesianPoint2d<Num = Num>,
    ) -> Self {
        let v = (q.y() - p.y()) * (r.x() - q.x()) - (q.x() - p.x()) * (r.y() - q.y());
        if v > Num::zero() {
            Self::Clockwise
        } else if v < Num::zero() {
            Self::Counterclockwise
        } else {
            Self::Collinear
        }
    }

    /// Determines orientation of a triplet of points with floating point coordinates.
    ///
    /// The sign of the determinant is exact for all but pathologically degenerate inputs: when the plain `f64`
    /// evaluation cannot guarantee the sign, the determinant is recomputed in double-double precision.
    pub fn robust(
        p: &impl CartesianPoint2d<Num = f64>,
        q: &impl CartesianPoint2d<Num = f64>,
        r: &impl CartesianPoint2d<Num = f64>,
    ) -> Self {
        Self::from_index(orientation_index((p.x(), p.y()), (q.x(), q.y()), (r.x(), r.y())))
    }

    /// Orientation from the sign of a determinant: positive values are counterclockwise.
    pub fn from_index(index: i32) -> Self {
        match index.signum() {
            1 => Self::Counterclockwise,
            -1 => Self::Clockwise,
            _ => Self::Collinear,
        }
    }

    /// Signed index of the orientation: `1` for counterclockwise, `-1` for clockwise and `0` for collinear.
    pub fn index(self) -> i32 {
        match self {
            Self::Counterclockwise => 1,
            Self::Clockwise => -1,
            Self::Collinear => 0,
        }
    }

    /// Returns true if the orientations are strictly on the same side (neither of them is collinear).
    pub fn same_side(self, other: Self) -> bool {
        self != Self::Collinear && self == other
    }
}
