use crate::cartesian::{CartesianPoint2d, Envelope};
use crate::contour::Contour;

/// Geometry consisting of several contours.
pub trait MultiContour {
    /// Contour type.
    type Contour: Contour;

    /// Iterator over contours.
    fn contours(&self) -> impl Iterator<Item = &Self::Contour>;

    /// Bounding envelope of all the contours.
    fn envelope(&self) -> Envelope
    where
        <Self::Contour as Contour>::Point: CartesianPoint2d<Num = f64>,
    {
        self.contours().map(|contour| contour.envelope()).collect()
    }
}
