use meridian_types::cartesian::{CartesianPoint2d, CartesianPoint2dFloat, Envelope, Point2};
use meridian_types::Segment;

use crate::linref::geometry::is_closed;
use crate::linref::LinearGeometry;

/// Factor applied to the size of a geometry to get a snap tolerance that does not change its shape.
const SNAP_PRECISION_FACTOR: f64 = 1e-9;

/// Snaps the vertices and segments of a line to a set of target points.
///
/// Snapping works in two steps:
/// 1. Every vertex of the line closer than the tolerance to a target point is moved to the nearest such point.
///    A vertex that is already equal to any of the targets is left where it is. For closed lines the first and
///    the last vertices are kept equal.
/// 2. Every target point closer than the tolerance to a segment of the line is inserted into the nearest such
///    segment. Targets that are already vertices of the line are not inserted.
///
/// Snapping the output again with the same targets and tolerance does not change it.
#[derive(Debug, Clone)]
pub struct LineSnapper {
    vertices: Vec<Point2>,
    tolerance: f64,
    is_closed: bool,
}

impl LineSnapper {
    /// Creates a snapper for the line with the given vertices.
    pub fn new(vertices: Vec<Point2>, tolerance: f64) -> Self {
        let is_closed = is_closed(&vertices);
        Self {
            vertices,
            tolerance,
            is_closed,
        }
    }

    /// Snap tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the vertices of the line snapped to the targets.
    pub fn snap_to(&self, targets: &[Point2]) -> Vec<Point2> {
        let mut vertices = self.vertices.clone();
        self.snap_vertices(&mut vertices, targets);
        self.snap_segments(&mut vertices, targets);

        vertices
    }

    fn snap_vertices(&self, vertices: &mut [Point2], targets: &[Point2]) {
        let end = if self.is_closed {
            vertices.len() - 1
        } else {
            vertices.len()
        };

        for index in 0..end {
            let Some(target) = self.find_snap_for_vertex(&vertices[index], targets) else {
                continue;
            };

            vertices[index] = target;
            if index == 0 && self.is_closed {
                if let Some(last) = vertices.last_mut() {
                    *last = target;
                }
            }
        }
    }

    fn find_snap_for_vertex(&self, vertex: &Point2, targets: &[Point2]) -> Option<Point2> {
        if targets.iter().any(|target| vertex.equal(target)) {
            return None;
        }

        targets
            .iter()
            .map(|target| (target, vertex.distance(target)))
            .filter(|(_, distance)| *distance < self.tolerance)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(target, _)| *target)
    }

    fn snap_segments(&self, vertices: &mut Vec<Point2>, targets: &[Point2]) {
        let (Some(first), Some(last)) = (targets.first(), targets.last()) else {
            return;
        };

        // Targets taken from a ring repeat the first point at the end.
        let distinct_count = if targets.len() > 1 && first.equal(last) {
            targets.len() - 1
        } else {
            targets.len()
        };

        for target in &targets[..distinct_count] {
            if let Some(index) = self.find_segment_to_snap(target, vertices) {
                insert_vertex(vertices, index + 1, *target);
            }
        }
    }

    /// Index of the closest segment within the tolerance from the target. Returns `None` if the target is equal
    /// to any vertex of the line.
    fn find_segment_to_snap(&self, target: &Point2, vertices: &[Point2]) -> Option<usize> {
        let mut min_distance = f64::MAX;
        let mut result = None;

        for (index, pair) in vertices.windows(2).enumerate() {
            if pair[0].equal(target) || pair[1].equal(target) {
                return None;
            }

            let distance = Segment(&pair[0], &pair[1]).distance_to_point(target);
            if distance < self.tolerance && distance < min_distance {
                min_distance = distance;
                result = Some(index);
            }
        }

        result
    }
}

/// Inserts the point unless it would repeat one of its neighbours.
fn insert_vertex(vertices: &mut Vec<Point2>, index: usize, point: Point2) {
    let repeats_prev = index > 0 && vertices[index - 1].equal(&point);
    let repeats_next = vertices.get(index).is_some_and(|next| next.equal(&point));

    if !repeats_prev && !repeats_next {
        vertices.insert(index, point);
    }
}

/// Snaps all parts of a [`LinearGeometry`] to the vertices of another geometry.
#[derive(Debug, Clone, Copy)]
pub struct GeometrySnapper<'a> {
    geometry: &'a LinearGeometry,
}

impl<'a> GeometrySnapper<'a> {
    /// Creates a snapper for the geometry.
    pub fn new(geometry: &'a LinearGeometry) -> Self {
        Self { geometry }
    }

    /// Snaps every part of the geometry to the distinct vertices of `target` with [`LineSnapper`].
    pub fn snap_to(&self, target: &LinearGeometry, tolerance: f64) -> LinearGeometry {
        let targets = distinct_vertices(target);
        LinearGeometry::new(
            self.geometry
                .parts()
                .iter()
                .map(|part| LineSnapper::new(part.clone(), tolerance).snap_to(&targets))
                .collect(),
        )
    }

    /// Snaps two geometries to each other: the first one to the second, and then the second one to the snapped
    /// first one.
    pub fn snap_pair(
        first: &LinearGeometry,
        second: &LinearGeometry,
        tolerance: f64,
    ) -> (LinearGeometry, LinearGeometry) {
        let first = GeometrySnapper::new(first).snap_to(second, tolerance);
        let second = GeometrySnapper::new(second).snap_to(&first, tolerance);

        (first, second)
    }
}

/// Snap tolerance small enough to not change the shape of a geometry with the given envelope noticeably.
pub fn size_based_snap_tolerance(envelope: &Envelope) -> f64 {
    if envelope.is_empty() {
        return 0.0;
    }

    envelope.min_extent() * SNAP_PRECISION_FACTOR
}

fn distinct_vertices(geometry: &LinearGeometry) -> Vec<Point2> {
    let mut vertices: Vec<Point2> = geometry.parts().iter().flatten().copied().collect();
    vertices.sort_by(|a, b| a.x().total_cmp(&b.x()).then(a.y().total_cmp(&b.y())));
    vertices.dedup_by(|a, b| a.equal(b));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn snaps_vertices() {
        let snapper = LineSnapper::new(vec![p(0.0, 0.0), p(10.0, 0.1), p(20.0, 0.0)], 0.5);
        let result = snapper.snap_to(&[p(10.0, 0.0)]);

        assert_eq!(result, vec![p(0.0, 0.0), p(10.0, 0.0), p(20.0, 0.0)]);
    }

    #[test]
    fn nearest_target_within_tolerance_wins() {
        let snapper = LineSnapper::new(vec![p(0.0, 0.0), p(10.0, 10.0)], 1.0);
        let result = snapper.snap_to(&[p(0.5, 0.0), p(0.1, 0.0)]);

        assert_eq!(result[0], p(0.1, 0.0));
    }

    #[test]
    fn coincident_vertex_is_not_moved() {
        let snapper = LineSnapper::new(vec![p(0.0, 0.0), p(10.0, 10.0)], 1.0);
        let result = snapper.snap_to(&[p(0.0, 0.0), p(0.1, 0.0)]);

        // The second target is still inserted into the segment.
        assert_eq!(result, vec![p(0.0, 0.0), p(0.1, 0.0), p(10.0, 10.0)]);
    }

    #[test]
    fn vertex_on_later_target_is_not_moved() {
        let line = vec![p(0.0, 0.0), p(10.0, 10.0)];
        let targets = [p(0.1, 0.0), p(0.0, 0.0)];

        let once = LineSnapper::new(line, 0.5).snap_to(&targets);
        assert_eq!(once, vec![p(0.0, 0.0), p(0.1, 0.0), p(10.0, 10.0)]);

        let twice = LineSnapper::new(once.clone(), 0.5).snap_to(&targets);
        assert_eq!(twice, once);
    }

    #[test]
    fn closed_ring_keeps_ends_equal() {
        let ring = vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 0.0)];
        let result = LineSnapper::new(ring, 0.5).snap_to(&[p(0.2, 0.2)]);

        assert_eq!(result.first(), Some(&p(0.2, 0.2)));
        assert_eq!(result.last(), Some(&p(0.2, 0.2)));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn cracks_segments() {
        let snapper = LineSnapper::new(vec![p(0.0, 0.0), p(10.0, 0.0)], 0.5);
        let result = snapper.snap_to(&[p(5.0, 0.2)]);

        assert_eq!(result, vec![p(0.0, 0.0), p(5.0, 0.2), p(10.0, 0.0)]);
    }

    #[test]
    fn cracks_nearest_segment_once() {
        let snapper = LineSnapper::new(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)], 0.55);
        let result = snapper.snap_to(&[p(9.5, 0.3), p(30.0, 30.0)]);

        assert_eq!(
            result,
            vec![p(0.0, 0.0), p(9.5, 0.3), p(10.0, 0.0), p(10.0, 10.0)]
        );
    }

    #[test]
    fn repeated_ring_target_is_used_once() {
        let snapper = LineSnapper::new(vec![p(0.0, 0.0), p(10.0, 0.0)], 0.5);
        let targets = [p(5.0, 0.2), p(7.0, 20.0), p(5.0, 0.2)];
        let result = snapper.snap_to(&targets);

        assert_eq!(result, vec![p(0.0, 0.0), p(5.0, 0.2), p(10.0, 0.0)]);
    }

    #[test]
    fn snapping_is_idempotent() {
        let line = vec![p(0.0, 0.0), p(5.1, 0.1), p(10.0, 0.0), p(20.0, 0.0)];
        let targets = [p(5.0, 0.0), p(15.0, 0.3), p(30.0, 30.0)];
        let tolerance = 0.5;

        let once = LineSnapper::new(line, tolerance).snap_to(&targets);
        assert_eq!(
            once,
            vec![p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0), p(15.0, 0.3), p(20.0, 0.0)]
        );

        let twice = LineSnapper::new(once.clone(), tolerance).snap_to(&targets);
        assert_eq!(twice, once);
    }

    #[test]
    fn geometry_snapper() {
        let source = LinearGeometry::new(vec![
            vec![p(0.0, 0.0), p(10.0, 0.1)],
            vec![p(0.0, 5.0), p(10.0, 5.0)],
        ]);
        let target = LinearGeometry::line(vec![p(10.0, 0.0), p(5.0, 5.2), p(10.0, 0.0)]);

        let snapped = GeometrySnapper::new(&source).snap_to(&target, 0.5);
        assert_eq!(
            snapped,
            LinearGeometry::new(vec![
                vec![p(0.0, 0.0), p(10.0, 0.0)],
                vec![p(0.0, 5.0), p(5.0, 5.2), p(10.0, 5.0)],
            ])
        );
    }

    #[test]
    fn geometry_snapping_is_idempotent() {
        let source = LinearGeometry::line(vec![p(0.35, 0.0), p(10.0, 10.0)]);
        let target = LinearGeometry::line(vec![p(0.1, 0.0), p(0.4, 0.0)]);

        let once = GeometrySnapper::new(&source).snap_to(&target, 0.5);
        assert_eq!(
            once,
            LinearGeometry::line(vec![p(0.4, 0.0), p(0.1, 0.0), p(10.0, 10.0)])
        );

        let twice = GeometrySnapper::new(&once).snap_to(&target, 0.5);
        assert_eq!(twice, once);
        assert!(twice.parts()[0].windows(2).all(|pair| !pair[0].equal(&pair[1])));
    }

    #[test]
    fn pair_snapping() {
        let first = LinearGeometry::line(vec![p(0.0, 0.0), p(10.0, 0.0)]);
        let second = LinearGeometry::line(vec![p(5.0, 0.1), p(5.0, 10.0)]);

        let (first, second) = GeometrySnapper::snap_pair(&first, &second, 0.5);
        assert_eq!(first, LinearGeometry::line(vec![p(0.0, 0.0), p(5.0, 0.1), p(10.0, 0.0)]));
        assert_eq!(second, LinearGeometry::line(vec![p(5.0, 0.1), p(5.0, 10.0)]));
    }

    #[test]
    fn size_based_tolerance() {
        let envelope = Envelope::new(0.0, 0.0, 1000.0, 2000.0);
        assert_eq!(size_based_snap_tolerance(&envelope), 1000.0 * SNAP_PRECISION_FACTOR);
        assert_eq!(size_based_snap_tolerance(&Envelope::EMPTY), 0.0);
    }
}
