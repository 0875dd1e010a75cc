//! Linear geometries given by a sequence of vertices.
//!
//! A [`Contour`] is either open, like a road, or closed, like a lake shore. A closed contour has an implicit
//! segment from its last vertex back to the first one, and the first vertex is not repeated at the end of the
//! vertex list. This differs from OGC `LineString`, which is closed when its first and last points are equal.
//! [`Contour::iter_points_closing`] and [`Contour::iter_segments`] take the implicit segment into account.
//!
//! Types that are always closed can implement [`ClosedContour`] instead and get the [`Contour`] implementation
//! for free.

use crate::cartesian::{CartesianPoint2d, Envelope};
use crate::geo::Projection;
use crate::segment::Segment;

/// Sequence of vertices, see the module documentation.
pub trait Contour {
    /// Vertex type.
    type Point;

    /// Returns true if the last vertex is connected to the first one.
    fn is_closed(&self) -> bool;

    /// Iterates over the vertices. The first vertex of a closed contour is not repeated at the end.
    fn iter_points(&self) -> impl Iterator<Item = &'_ Self::Point>;

    /// Iterates over the vertices, repeating the first one at the end for closed contours.
    fn iter_points_closing(&self) -> impl Iterator<Item = &Self::Point> {
        let closing = if self.is_closed() {
            self.iter_points().next()
        } else {
            None
        };

        self.iter_points().chain(closing)
    }

    /// Iterates over the segments, including the closing one for closed contours.
    fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Self::Point>> {
        let mut points = self.iter_points_closing();
        let first = points.next();

        points.scan(first, |prev, point| {
            let start = prev.replace(point)?;
            Some(Segment(start, point))
        })
    }

    /// Number of vertices, counting the first vertex of a closed contour twice.
    fn vertex_count(&self) -> usize {
        self.iter_points_closing().count()
    }

    /// Sum of the segment lengths.
    fn length(&self) -> f64
    where
        Self::Point: CartesianPoint2d<Num = f64>,
    {
        self.iter_segments().map(|segment| segment.length()).sum()
    }

    /// Bounding envelope of the vertices.
    fn envelope(&self) -> Envelope
    where
        Self::Point: CartesianPoint2d<Num = f64>,
    {
        Envelope::from_points(self.iter_points())
    }

    /// Projects every vertex with the `projection`. Returns `None` if any of the vertices cannot be projected.
    fn project_points<Proj>(
        &self,
        projection: &Proj,
    ) -> Option<crate::impls::Contour<Proj::OutPoint>>
    where
        Proj: Projection<InPoint = Self::Point> + ?Sized,
    {
        let points = self
            .iter_points()
            .map(|point| projection.project(point))
            .collect::<Option<Vec<_>>>()?;

        Some(crate::impls::Contour::new(points, self.is_closed()))
    }
}

/// Contour that is always closed.
pub trait ClosedContour {
    /// Vertex type.
    type Point;

    /// Iterates over the vertices without repeating the first one at the end.
    fn iter_points(&self) -> impl Iterator<Item = &'_ Self::Point>;
}

impl<P, T: ClosedContour<Point = P>> Contour for T {
    type Point = P;

    fn is_closed(&self) -> bool {
        true
    }

    fn iter_points(&self) -> impl Iterator<Item = &'_ Self::Point> {
        ClosedContour::iter_points(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::Point2;
    use crate::impls::{ClosedContour, Contour as ContourImpl};

    #[test]
    fn closing_vertex() {
        let open = ContourImpl::open(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        assert_eq!(open.vertex_count(), 2);
        assert_eq!(open.iter_points_closing().last(), Some(&Point2::new(1.0, 1.0)));

        let closed = ClosedContour::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        assert_eq!(closed.vertex_count(), 3);
        assert_eq!(closed.iter_points_closing().last(), Some(&Point2::new(0.0, 0.0)));
    }

    #[test]
    fn segments() {
        let single = ContourImpl::open(vec![Point2::new(0.0, 0.0)]);
        assert_eq!(single.iter_segments().count(), 0);

        let empty = ClosedContour::<Point2>::new(vec![]);
        assert_eq!(empty.iter_segments().count(), 0);

        let closed = ClosedContour::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        let segments: Vec<_> = closed.iter_segments().collect();
        assert_eq!(
            segments,
            vec![
                Segment(&Point2::new(0.0, 0.0), &Point2::new(1.0, 1.0)),
                Segment(&Point2::new(1.0, 1.0), &Point2::new(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn length_and_envelope() {
        let triangle = ClosedContour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 4.0),
        ]);

        assert_eq!(triangle.length(), 12.0);
        assert_eq!(triangle.envelope(), Envelope::new(0.0, 0.0, 3.0, 4.0));
    }
}
