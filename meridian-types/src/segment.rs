use crate::cartesian::{CartesianPoint2d, Envelope, Orientation, Point2};
use num_traits::{One, Zero};

/// A strait line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

impl<P> Clone for Segment<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Segment<'_, P> {}

impl<'a, P: CartesianPoint2d> Segment<'a, P> {
    /// Shortest euclidian distance (squared) between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * if the normal from the point to the segment ends outside of the segment, the returned value is the smaller one
    ///   of the distances between the point and the segment's endpoints
    pub fn distance_to_point_sq<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        point: &Point,
    ) -> P::Num {
        if self.0.equal(self.1) {
            return self.0.distance_sq(point);
        }

        let ds = self.1.sub(self.0);
        let dp = point.sub(self.0);
        let ds_len = ds.dx() * ds.dx() + ds.dy() * ds.dy();

        let r = (dp.dx() * ds.dx() + dp.dy() * ds.dy()) / ds_len;
        if r <= P::Num::zero() {
            self.0.distance_sq(point)
        } else if r >= P::Num::one() {
            self.1.distance_sq(point)
        } else {
            let s = (dp.dy() * ds.dx() - dp.dx() * ds.dy()) / ds_len;
            (s * s) * ds_len
        }
    }

    /// Returns true, if the segment has at least one common point with the `other` segment.
    pub fn intersects<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        other: &Segment<Point>,
    ) -> bool {
        fn on_segment<Num: num_traits::Num + PartialOrd>(
            p: &impl CartesianPoint2d<Num = Num>,
            q: &impl CartesianPoint2d<Num = Num>,
            r: &impl CartesianPoint2d<Num = Num>,
        ) -> bool {
            let x_max = if p.x() >= r.x() { p.x() } else { r.x() };
            let x_min = if p.x() <= r.x() { p.x() } else { r.x() };
            let y_max = if p.y() >= r.y() { p.y() } else { r.y() };
            let y_min = if p.y() <= r.y() { p.y() } else { r.y() };

            q.x() <= x_max && q.x() >= x_min && q.y() <= y_max && q.y() >= y_min
        }

        let o1 = Orientation::triplet(self.0, other.0, self.1);
        let o2 = Orientation::triplet(self.0, other.1, self.1);
        let o3 = Orientation::triplet(other.0, self.0, other.1);
        let o4 = Orientation::triplet(other.0, self.1, other.1);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        if o1 == Orientation::Collinear && on_segment(self.0, other.0, self.1) {
            return true;
        }
        if o2 == Orientation::Collinear && on_segment(self.0, other.1, self.1) {
            return true;
        }
        if o3 == Orientation::Collinear && on_segment(other.0, self.0, other.1) {
            return true;
        }
        if o4 == Orientation::Collinear && on_segment(other.0, self.1, other.1) {
            return true;
        }

        false
    }
}

impl<'a, P: CartesianPoint2d<Num = f64>> Segment<'a, P> {
    /// Length of the segment.
    pub fn length(&self) -> f64 {
        let v = self.1.sub(self.0);
        v.dx().hypot(v.dy())
    }

    /// Bounding envelope of the segment.
    pub fn envelope(&self) -> Envelope {
        Envelope::from_segment(self.0, self.1)
    }

    /// Shortest distance between the point and the segment.
    pub fn distance_to_point(&self, point: &impl CartesianPoint2d<Num = f64>) -> f64 {
        self.distance_to_point_sq(point).sqrt()
    }

    /// Position of the orthogonal projection of the point onto the line through the segment, as a multiple of the
    /// segment vector: `0` at the start point, `1` at the end point, and outside of `[0, 1]` for projections that
    /// fall beyond the segment ends.
    ///
    /// Returns exactly `0` or `1` if the point equals one of the endpoints, and `0` for zero-length segments.
    pub fn projection_factor(&self, point: &impl CartesianPoint2d<Num = f64>) -> f64 {
        if point.equal(self.0) {
            return 0.0;
        }
        if point.equal(self.1) {
            return 1.0;
        }

        let ds = self.1.sub(self.0);
        let len_sq = ds.dx() * ds.dx() + ds.dy() * ds.dy();
        if len_sq <= 0.0 {
            return 0.0;
        }

        let dp = point.sub(self.0);
        (dp.dx() * ds.dx() + dp.dy() * ds.dy()) / len_sq
    }

    /// Fraction of the segment length at which the closest point to `point` lies, clamped to `[0, 1]`.
    pub fn segment_fraction(&self, point: &impl CartesianPoint2d<Num = f64>) -> f64 {
        let factor = self.projection_factor(point);
        if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, 1.0)
        }
    }

    /// Point at the given fraction of the segment. Endpoints are returned exactly for `0` and `1`.
    pub fn point_along(&self, fraction: f64) -> Point2 {
        Point2::from_point(self.0).lerp(&Point2::from_point(self.1), fraction)
    }

    /// Closest point of the segment to the given point.
    pub fn closest_point(&self, point: &impl CartesianPoint2d<Num = f64>) -> Point2 {
        self.point_along(self.segment_fraction(point))
    }
}
