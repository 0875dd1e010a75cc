use serde::{Deserialize, Serialize};

/// Vertex list implementing [`crate::contour::Contour`]. Whether the line is closed is stored as a flag, the
/// closing vertex is never duplicated.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct Contour<Point> {
    points: Vec<Point>,
    is_closed: bool,
}

impl<Point> Contour<Point> {
    /// Creates a new contour.
    pub fn new(points: Vec<Point>, is_closed: bool) -> Self {
        Self { points, is_closed }
    }

    /// Creates an open contour.
    pub fn open(points: Vec<Point>) -> Self {
        Self::new(points, false)
    }

    /// Creates a closed contour.
    pub fn closed(points: Vec<Point>) -> Self {
        Self::new(points, true)
    }

    /// Vertices of the contour.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consumes the contour returning its vertices.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl<P> crate::contour::Contour for Contour<P> {
    type Point = P;

    fn is_closed(&self) -> bool {
        self.is_closed
    }

    fn iter_points(&self) -> impl Iterator<Item = &P> {
        self.points.iter()
    }
}

/// Vertex list of a ring, implementing [`crate::contour::ClosedContour`].
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClosedContour<Point> {
    /// Vertices of the ring without the closing one.
    pub points: Vec<Point>,
}

impl<Point> ClosedContour<Point> {
    /// Creates a new ring.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl<P> crate::contour::ClosedContour for ClosedContour<P> {
    type Point = P;

    fn iter_points(&self) -> impl Iterator<Item = &'_ P> {
        self.points.iter()
    }
}

impl<P> From<ClosedContour<P>> for Contour<P> {
    fn from(value: ClosedContour<P>) -> Self {
        Self::closed(value.points)
    }
}
