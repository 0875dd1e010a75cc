use meridian_types::cartesian::{CartesianPoint2d, Envelope, Orientation, Point2};
use nalgebra::Vector3;

use crate::algorithm::PrecisionModel;

/// Result of intersecting two segments or a point with a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The geometries do not intersect.
    None,
    /// The geometries intersect at a single point.
    Point {
        /// Intersection point.
        point: Point2,
        /// True if the point is in the interior of both geometries, i.e. it is not an end point of any of the
        /// input segments.
        is_proper: bool,
    },
    /// The segments are collinear and overlap along the segment between the two points.
    Collinear(Point2, Point2),
}

impl SegmentIntersection {
    /// Returns true if the geometries intersect.
    pub fn has_intersection(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns true if the intersection is a single point in the interior of both segments.
    pub fn is_proper(&self) -> bool {
        matches!(self, Self::Point { is_proper: true, .. })
    }

    /// Returns true if the segments overlap.
    pub fn is_collinear(&self) -> bool {
        matches!(self, Self::Collinear(..))
    }

    /// Number of intersection points: `0`, `1` or `2`.
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Point { .. } => 1,
            Self::Collinear(..) => 2,
        }
    }

    /// Iterates over the intersection points.
    pub fn points(&self) -> impl Iterator<Item = Point2> {
        let (first, second) = match *self {
            Self::None => (None, None),
            Self::Point { point, .. } => (Some(point), None),
            Self::Collinear(a, b) => (Some(a), Some(b)),
        };

        first.into_iter().chain(second)
    }

    /// Returns true if any of the intersection points is not an end point of the segment `p0-p1`.
    pub fn is_interior(
        &self,
        p0: &impl CartesianPoint2d<Num = f64>,
        p1: &impl CartesianPoint2d<Num = f64>,
    ) -> bool {
        self.points()
            .any(|point| !point.equal(p0) && !point.equal(p1))
    }
}

/// Computes intersections of segments.
///
/// The topology of the result is always consistent with the robust [`Orientation`] predicate: two segments
/// are reported to intersect exactly when the orientation of their end points says so. The coordinates of a
/// proper intersection are computed in floating point and may be rounded with a [`PrecisionModel`].
///
/// ```
/// use meridian::algorithm::{LineIntersector, SegmentIntersection};
/// use meridian::Point2;
///
/// let intersector = LineIntersector::new();
/// let result = intersector.compute_segments(
///     &Point2::new(0.0, 0.0),
///     &Point2::new(10.0, 0.0),
///     &Point2::new(5.0, -5.0),
///     &Point2::new(5.0, 5.0),
/// );
///
/// assert_eq!(
///     result,
///     SegmentIntersection::Point { point: Point2::new(5.0, 0.0), is_proper: true }
/// );
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LineIntersector {
    precision_model: PrecisionModel,
}

impl LineIntersector {
    /// Intersector with floating precision.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the precision model used to round computed intersection points.
    pub fn with_precision_model(mut self, precision_model: PrecisionModel) -> Self {
        self.precision_model = precision_model;
        self
    }

    /// Precision model of the intersector.
    pub fn precision_model(&self) -> PrecisionModel {
        self.precision_model
    }

    /// Intersects the point `p` with the segment `p1-p2`.
    pub fn compute_point(
        &self,
        p: &impl CartesianPoint2d<Num = f64>,
        p1: &impl CartesianPoint2d<Num = f64>,
        p2: &impl CartesianPoint2d<Num = f64>,
    ) -> SegmentIntersection {
        if !Envelope::from_segment(p1, p2).intersects_point(p) {
            return SegmentIntersection::None;
        }

        if Orientation::robust(p1, p2, p) == Orientation::Collinear
            && Orientation::robust(p2, p1, p) == Orientation::Collinear
        {
            SegmentIntersection::Point {
                point: Point2::from_point(p),
                is_proper: !p.equal(p1) && !p.equal(p2),
            }
        } else {
            SegmentIntersection::None
        }
    }

    /// Intersects segments `p1-p2` and `q1-q2`.
    pub fn compute_segments(
        &self,
        p1: &impl CartesianPoint2d<Num = f64>,
        p2: &impl CartesianPoint2d<Num = f64>,
        q1: &impl CartesianPoint2d<Num = f64>,
        q2: &impl CartesianPoint2d<Num = f64>,
    ) -> SegmentIntersection {
        let (p1, p2) = (Point2::from_point(p1), Point2::from_point(p2));
        let (q1, q2) = (Point2::from_point(q1), Point2::from_point(q2));

        if !Envelope::from_segment(&p1, &p2).intersects(&Envelope::from_segment(&q1, &q2)) {
            return SegmentIntersection::None;
        }

        let pq1 = Orientation::robust(&p1, &p2, &q1);
        let pq2 = Orientation::robust(&p1, &p2, &q2);
        if pq1.same_side(pq2) {
            return SegmentIntersection::None;
        }

        let qp1 = Orientation::robust(&q1, &q2, &p1);
        let qp2 = Orientation::robust(&q1, &q2, &p2);
        if qp1.same_side(qp2) {
            return SegmentIntersection::None;
        }

        let collinear = pq1 == Orientation::Collinear
            && pq2 == Orientation::Collinear
            && qp1 == Orientation::Collinear
            && qp2 == Orientation::Collinear;
        if collinear {
            return collinear_intersection(p1, p2, q1, q2);
        }

        if pq1 == Orientation::Collinear
            || pq2 == Orientation::Collinear
            || qp1 == Orientation::Collinear
            || qp2 == Orientation::Collinear
        {
            // An end point of one segment lies on the other one. Exactly equal end points take priority,
            // so the result is one of the input coordinates and not a rounded copy of it.
            let point = if p1.equal(&q1) || p1.equal(&q2) {
                p1
            } else if p2.equal(&q1) || p2.equal(&q2) {
                p2
            } else if pq1 == Orientation::Collinear {
                q1
            } else if pq2 == Orientation::Collinear {
                q2
            } else if qp1 == Orientation::Collinear {
                p1
            } else {
                p2
            };

            return SegmentIntersection::Point {
                point,
                is_proper: false,
            };
        }

        SegmentIntersection::Point {
            point: self.proper_intersection(p1, p2, q1, q2),
            is_proper: true,
        }
    }

    fn proper_intersection(&self, p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> Point2 {
        let p_envelope = Envelope::from_segment(&p1, &p2);
        let q_envelope = Envelope::from_segment(&q1, &q2);

        let point = match homogeneous_intersection(p1, p2, q1, q2) {
            Some(point)
                if p_envelope.contains_point(&point) && q_envelope.contains_point(&point) =>
            {
                point
            }
            _ => {
                let point = central_endpoint(p1, p2, q1, q2);
                log::trace!(
                    "Intersection of {p1:?}-{p2:?} and {q1:?}-{q2:?} is off the segments, \
                     using {point:?}"
                );
                point
            }
        };

        self.precision_model.make_precise(point)
    }
}

fn collinear_intersection(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> SegmentIntersection {
    let p_envelope = Envelope::from_segment(&p1, &p2);
    let q_envelope = Envelope::from_segment(&q1, &q2);

    let p1q1p2 = p_envelope.intersects_point(&q1);
    let p1q2p2 = p_envelope.intersects_point(&q2);
    let q1p1q2 = q_envelope.intersects_point(&p1);
    let q1p2q2 = q_envelope.intersects_point(&p2);

    let touch_or_overlap = |a: Point2, b: Point2, single: bool| {
        if a.equal(&b) && single {
            SegmentIntersection::Point {
                point: a,
                is_proper: false,
            }
        } else {
            SegmentIntersection::Collinear(a, b)
        }
    };

    if p1q1p2 && p1q2p2 {
        SegmentIntersection::Collinear(q1, q2)
    } else if q1p1q2 && q1p2q2 {
        SegmentIntersection::Collinear(p1, p2)
    } else if p1q1p2 && q1p1q2 {
        touch_or_overlap(q1, p1, !p1q2p2 && !q1p2q2)
    } else if p1q1p2 && q1p2q2 {
        touch_or_overlap(q1, p2, !p1q2p2 && !q1p1q2)
    } else if p1q2p2 && q1p1q2 {
        touch_or_overlap(q2, p1, !p1q1p2 && !q1p2q2)
    } else if p1q2p2 && q1p2q2 {
        touch_or_overlap(q2, p2, !p1q1p2 && !q1p1q2)
    } else {
        SegmentIntersection::None
    }
}

/// Intersection of the lines through the segments in homogeneous coordinates.
///
/// The coordinates are shifted to the middle of the common part of the segment envelopes first, which keeps
/// the magnitudes small and the rounding error low.
fn homogeneous_intersection(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> Option<Point2> {
    let origin = Envelope::from_segment(&p1, &p2)
        .intersection(&Envelope::from_segment(&q1, &q2))
        .center()
        .unwrap_or_default();

    let homogeneous = |p: Point2| Vector3::new(p.x() - origin.x(), p.y() - origin.y(), 1.0);
    let line_p = homogeneous(p1).cross(&homogeneous(p2));
    let line_q = homogeneous(q1).cross(&homogeneous(q2));
    let point = line_p.cross(&line_q);

    let result = Point2::new(point.x / point.z + origin.x(), point.y / point.z + origin.y());
    result.is_finite().then_some(result)
}

/// Input end point closest to the average of all four end points.
fn central_endpoint(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> Point2 {
    let points = [p1, p2, q1, q2];
    let center = Point2::new(
        points.iter().map(|p| p.x()).sum::<f64>() / 4.0,
        points.iter().map(|p| p.y()).sum::<f64>() / 4.0,
    );

    let mut result = p1;
    let mut min_distance = f64::INFINITY;
    for point in points {
        let distance = point.distance_sq(&center);
        if distance < min_distance {
            min_distance = distance;
            result = point;
        }
    }

    result
}

/// Distance of the point `p` along the segment `p0-p1`, measured along the dominant axis of the segment.
///
/// The value is not the euclidean distance but it is monotonic along the segment and cheap to compute, so it
/// is suitable for ordering intersection points on an edge. The point is expected to lie on the segment.
pub fn edge_distance(
    p: &impl CartesianPoint2d<Num = f64>,
    p0: &impl CartesianPoint2d<Num = f64>,
    p1: &impl CartesianPoint2d<Num = f64>,
) -> f64 {
    let dx = (p1.x() - p0.x()).abs();
    let dy = (p1.y() - p0.y()).abs();

    if p.equal(p0) {
        return 0.0;
    }
    if p.equal(p1) {
        return dx.max(dy);
    }

    let pdx = (p.x() - p0.x()).abs();
    let pdy = (p.y() - p0.y()).abs();
    let distance = if dx > dy { pdx } else { pdy };

    // A point distinct from p0 must not get zero distance.
    if distance == 0.0 {
        pdx.max(pdy)
    } else {
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn intersect(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> SegmentIntersection {
        LineIntersector::new().compute_segments(&p1, &p2, &q1, &q2)
    }

    fn sorted_points(intersection: &SegmentIntersection) -> Vec<(f64, f64)> {
        let mut points: Vec<_> = intersection.points().map(|p| (p.x(), p.y())).collect();
        points.sort_by(|a, b| a.partial_cmp(b).unwrap());
        points
    }

    #[test]
    fn proper_crossing() {
        let result = intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, -5.0), p(5.0, 5.0));
        assert_eq!(
            result,
            SegmentIntersection::Point {
                point: p(5.0, 0.0),
                is_proper: true
            }
        );
        assert!(result.is_proper());
        assert!(result.is_interior(&p(0.0, 0.0), &p(10.0, 0.0)));
    }

    #[test]
    fn diagonal_crossing() {
        let result = intersect(p(0.0, 0.0), p(3.0, 1.0), p(0.0, 1.0), p(3.0, 0.0));
        let SegmentIntersection::Point { point, is_proper } = result else {
            panic!("expected point intersection, got {result:?}");
        };

        assert!(is_proper);
        assert_abs_diff_eq!(point, p(1.5, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn disjoint_segments() {
        assert_eq!(
            intersect(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)),
            SegmentIntersection::None
        );
        assert_eq!(
            intersect(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 1.0), p(10.0, 1.0)),
            SegmentIntersection::None
        );
        assert_eq!(
            intersect(p(0.0, 0.0), p(10.0, 10.0), p(6.0, 4.0), p(10.0, 0.0)),
            SegmentIntersection::None
        );
    }

    #[test]
    fn endpoint_touches_interior() {
        let result = intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(5.0, 5.0));
        assert_eq!(
            result,
            SegmentIntersection::Point {
                point: p(5.0, 0.0),
                is_proper: false
            }
        );
        assert!(result.is_interior(&p(0.0, 0.0), &p(10.0, 0.0)));
        assert!(!result.is_interior(&p(5.0, 0.0), &p(5.0, 5.0)));
    }

    #[test]
    fn shared_endpoint() {
        let result = intersect(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 0.0), p(0.0, 10.0));
        assert_eq!(
            result,
            SegmentIntersection::Point {
                point: p(0.0, 0.0),
                is_proper: false
            }
        );
    }

    #[test]
    fn collinear_overlap() {
        let result = intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(15.0, 0.0));
        assert!(result.is_collinear());
        assert_eq!(result.count(), 2);
        assert_eq!(sorted_points(&result), vec![(5.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn collinear_containment() {
        let result = intersect(p(0.0, 0.0), p(10.0, 10.0), p(2.0, 2.0), p(4.0, 4.0));
        assert_eq!(result, SegmentIntersection::Collinear(p(2.0, 2.0), p(4.0, 4.0)));

        let result = intersect(p(2.0, 2.0), p(4.0, 4.0), p(0.0, 0.0), p(10.0, 10.0));
        assert_eq!(result, SegmentIntersection::Collinear(p(2.0, 2.0), p(4.0, 4.0)));
    }

    #[test]
    fn collinear_touch_at_end() {
        let result = intersect(p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.0), p(20.0, 0.0));
        assert_eq!(
            result,
            SegmentIntersection::Point {
                point: p(10.0, 0.0),
                is_proper: false
            }
        );
    }

    #[test]
    fn identical_segments() {
        let a = p(0.0, 0.0);
        let b = p(10.0, 5.0);

        assert_eq!(intersect(a, b, a, b), SegmentIntersection::Collinear(a, b));

        for result in [intersect(a, b, b, a), intersect(b, a, a, b)] {
            assert!(result.is_collinear());
            assert_eq!(sorted_points(&result), vec![(0.0, 0.0), (10.0, 5.0)]);
        }
    }

    #[test]
    fn collinear_shared_endpoint() {
        let expected = SegmentIntersection::Point {
            point: p(5.0, 5.0),
            is_proper: false,
        };

        assert_eq!(intersect(p(0.0, 0.0), p(5.0, 5.0), p(5.0, 5.0), p(9.0, 9.0)), expected);
        assert_eq!(intersect(p(5.0, 5.0), p(9.0, 9.0), p(0.0, 0.0), p(5.0, 5.0)), expected);
        assert_eq!(intersect(p(5.0, 5.0), p(0.0, 0.0), p(9.0, 9.0), p(5.0, 5.0)), expected);
    }

    #[test]
    fn result_does_not_depend_on_segment_order() {
        let cases = [
            [p(0.0, 0.0), p(10.0, 0.0), p(5.0, -5.0), p(5.0, 5.0)],
            [p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(5.0, 5.0)],
            [p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(15.0, 0.0)],
            [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.0), p(20.0, 0.0)],
            [p(0.0, 0.0), p(3.0, 1.0), p(0.0, 1.0), p(3.0, 0.0)],
            [p(1.0, 1.0), p(4.0, 7.0), p(0.0, 5.0), p(6.0, 2.0)],
            [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)],
        ];

        for [p1, p2, q1, q2] in cases {
            let direct = intersect(p1, p2, q1, q2);
            let swapped = intersect(q1, q2, p1, p2);

            assert_eq!(direct.count(), swapped.count());
            assert_eq!(direct.is_proper(), swapped.is_proper());
            assert_eq!(sorted_points(&direct), sorted_points(&swapped));
        }
    }

    #[test]
    fn near_parallel_result_stays_on_segments() {
        let p1 = p(0.0, 0.0);
        let p2 = p(1.0e9, 1.0);
        let q1 = p(1.0, 1.0e-9);
        let q2 = p(1.0e9 - 1.0, 1.0 - 1.0e-9);

        let result = intersect(p1, p2, q1, q2);
        for point in result.points() {
            let on_both = Envelope::from_segment(&p1, &p2).contains_point(&point)
                && Envelope::from_segment(&q1, &q2).contains_point(&point);
            let is_endpoint = [p1, p2, q1, q2].iter().any(|e| e.equal(&point));
            assert!(on_both || is_endpoint, "{point:?} is off the segments");
        }
    }

    #[test]
    fn central_endpoint_selection() {
        // The average of the end points is (8.5, 0.5).
        let result = central_endpoint(p(0.0, 0.0), p(10.0, 0.0), p(4.0, 1.0), p(20.0, 1.0));
        assert_eq!(result, p(10.0, 0.0));
    }

    #[test]
    fn fixed_precision() {
        let intersector = LineIntersector::new().with_precision_model(PrecisionModel::fixed(1.0));
        let result =
            intersector.compute_segments(&p(0.0, 0.0), &p(3.0, 1.0), &p(0.0, 1.0), &p(3.0, 0.0));
        assert_eq!(
            result,
            SegmentIntersection::Point {
                point: p(2.0, 1.0),
                is_proper: true
            }
        );

        // End point intersections are returned as they are.
        let result =
            intersector.compute_segments(&p(0.0, 0.0), &p(10.0, 0.0), &p(5.5, 0.0), &p(5.5, 5.0));
        assert_eq!(
            result,
            SegmentIntersection::Point {
                point: p(5.5, 0.0),
                is_proper: false
            }
        );
    }

    #[test]
    fn point_on_segment() {
        let intersector = LineIntersector::new();
        let a = p(0.0, 0.0);
        let b = p(10.0, 10.0);

        assert_eq!(
            intersector.compute_point(&p(5.0, 5.0), &a, &b),
            SegmentIntersection::Point {
                point: p(5.0, 5.0),
                is_proper: true
            }
        );
        assert_eq!(
            intersector.compute_point(&a, &a, &b),
            SegmentIntersection::Point {
                point: a,
                is_proper: false
            }
        );
        assert_eq!(
            intersector.compute_point(&p(5.0, 5.1), &a, &b),
            SegmentIntersection::None
        );
        assert_eq!(
            intersector.compute_point(&p(11.0, 11.0), &a, &b),
            SegmentIntersection::None
        );
    }

    #[test]
    fn points_iterator() {
        assert_eq!(SegmentIntersection::None.points().count(), 0);
        assert!(!SegmentIntersection::None.has_intersection());

        let collinear = SegmentIntersection::Collinear(p(1.0, 1.0), p(2.0, 2.0));
        assert_eq!(collinear.points().collect::<Vec<_>>(), vec![p(1.0, 1.0), p(2.0, 2.0)]);
        assert!(collinear.has_intersection());
        assert!(!collinear.is_proper());
    }

    #[test]
    fn edge_distance_along_dominant_axis() {
        let p0 = p(0.0, 0.0);
        let p1 = p(10.0, 2.0);

        assert_eq!(edge_distance(&p0, &p0, &p1), 0.0);
        assert_eq!(edge_distance(&p1, &p0, &p1), 10.0);
        assert_eq!(edge_distance(&p(5.0, 1.0), &p0, &p1), 5.0);

        let vertical = p(0.0, 10.0);
        assert_eq!(edge_distance(&p(0.0, 4.0), &p0, &vertical), 4.0);
    }

    #[test]
    fn edge_distance_is_not_zero_for_distinct_points() {
        let p0 = p(0.0, 0.0);
        let p1 = p(10.0, 2.0);

        // The point differs from p0 only in the minor axis.
        assert_eq!(edge_distance(&p(0.0, 1.0e-3), &p0, &p1), 1.0e-3);
    }
}
