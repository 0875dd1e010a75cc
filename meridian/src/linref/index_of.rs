use meridian_types::cartesian::CartesianPoint2d;
use meridian_types::Segment;

use crate::linref::{LinearGeometry, LinearIterator, LinearLocation};

/// Location of the point of the geometry closest to the given point.
///
/// If several segments are equally close, the location on the first of them is returned. Returns
/// [`LinearLocation::start`] if the geometry has no segments.
pub fn index_of(
    geometry: &LinearGeometry,
    point: &impl CartesianPoint2d<Num = f64>,
) -> LinearLocation {
    closest_location(geometry, point, None).unwrap_or_default()
}

/// Location of the point of the geometry closest to the given point, searching only the locations strictly
/// after `min_location`.
///
/// This allows finding all occurrences of a point on self-intersecting lines. If `min_location` is at or past
/// the end of the geometry, the end location is returned. If there are no locations after `min_location`,
/// `min_location` itself is returned.
pub fn index_of_after(
    geometry: &LinearGeometry,
    point: &impl CartesianPoint2d<Num = f64>,
    min_location: &LinearLocation,
) -> LinearLocation {
    let end = LinearLocation::end_of(geometry);
    if end <= *min_location {
        return end;
    }

    closest_location(geometry, point, Some(min_location)).unwrap_or(*min_location)
}

/// Locations of the start and the end of a sub-line of the geometry.
///
/// The sub-line is expected to be a part of the geometry, for example, a result of
/// [`extract_line`](super::extract_line). The end is searched after the start, so the result is correct for
/// sub-lines of self-intersecting geometries too. Returns `None` if the sub-line has no vertices.
pub fn index_of_line(
    geometry: &LinearGeometry,
    subline: &LinearGeometry,
) -> Option<[LinearLocation; 2]> {
    let start_point = subline.first_vertex()?;
    let end_point = subline.last_vertex()?;

    let start = index_of(geometry, &start_point);
    let end = if subline.length() == 0.0 {
        start
    } else {
        index_of_after(geometry, &end_point, &start)
    };

    Some([start, end])
}

fn closest_location(
    geometry: &LinearGeometry,
    point: &impl CartesianPoint2d<Num = f64>,
    min_location: Option<&LinearLocation>,
) -> Option<LinearLocation> {
    let mut closest: Option<(f64, LinearLocation)> = None;

    let mut iter = LinearIterator::from_start(geometry);
    while iter.has_next() {
        if let (Some(start), Some(end)) = (iter.segment_start(), iter.segment_end()) {
            let segment = Segment(&start, &end);
            let distance = segment.distance_to_point(point);
            let is_closer = closest.map_or(true, |(min_distance, _)| distance < min_distance);

            if is_closer {
                let fraction = segment.segment_fraction(point);
                let is_after = min_location.map_or(true, |min| {
                    min.compare_location_values(iter.part_index(), iter.vertex_index(), fraction)
                        == std::cmp::Ordering::Less
                });

                if is_after {
                    let location = LinearLocation::normalized(
                        iter.part_index(),
                        iter.vertex_index(),
                        fraction,
                    );
                    closest = Some((distance, location));
                }
            }
        }

        iter.advance();
    }

    closest.map(|(_, location)| location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linref::extract_line;
    use meridian_types::cartesian::Point2;

    fn loc(part: usize, segment: usize, fraction: f64) -> LinearLocation {
        LinearLocation::new(part, segment, fraction).unwrap()
    }

    #[test]
    fn closest_point() {
        let geometry = LinearGeometry::line(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ]);

        assert_eq!(index_of(&geometry, &Point2::new(4.0, 3.0)), loc(0, 0, 0.4));
        assert_eq!(index_of(&geometry, &Point2::new(12.0, 5.0)), loc(0, 1, 0.5));
        assert_eq!(index_of(&geometry, &Point2::new(20.0, 20.0)), loc(0, 2, 0.0));
        assert_eq!(index_of(&geometry, &Point2::new(-5.0, -5.0)), loc(0, 0, 0.0));
    }

    #[test]
    fn ties_resolve_to_first() {
        // A point equally distant from both segments of a symmetric line.
        let geometry = LinearGeometry::line(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 0.0),
        ]);

        assert_eq!(index_of(&geometry, &Point2::new(5.0, 1.0)), loc(0, 0, 0.5));
    }

    #[test]
    fn occurrence_after_location() {
        let geometry = LinearGeometry::line(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 0.0),
        ]);
        let point = Point2::new(5.0, 0.0);

        let first = index_of(&geometry, &point);
        assert_eq!(first, loc(0, 0, 0.5));

        let second = index_of_after(&geometry, &point, &first);
        assert_eq!(second, loc(0, 1, 0.5));

        // No more occurrences after the second one.
        assert_eq!(index_of_after(&geometry, &point, &second), second);
    }

    #[test]
    fn after_end_location() {
        let geometry = LinearGeometry::line(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)]);
        let end = LinearLocation::end_of(&geometry);

        assert_eq!(index_of_after(&geometry, &Point2::new(5.0, 0.0), &end), end);
        assert_eq!(
            index_of_after(&geometry, &Point2::new(5.0, 0.0), &loc(4, 0, 0.0)),
            end
        );
    }

    #[test]
    fn subline_locations() {
        let geometry = LinearGeometry::line(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ]);
        let start = loc(0, 0, 0.5);
        let end = loc(0, 1, 0.5);
        let subline = extract_line(&geometry, &start, &end);

        assert_eq!(index_of_line(&geometry, &subline), Some([start, end]));
        assert_eq!(index_of_line(&geometry, &LinearGeometry::default()), None);
    }

    #[test]
    fn empty_geometry() {
        let geometry = LinearGeometry::default();
        assert_eq!(index_of(&geometry, &Point2::new(1.0, 1.0)), LinearLocation::start());
    }
}
