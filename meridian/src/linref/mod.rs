//! Linear referencing: addressing points of linear geometries by their position along the line.
//!
//! A position is described by a [`LinearLocation`]. Locations can be converted to points and lengths, found for
//! arbitrary points with [`index_of`] and used to extract sub-lines with [`extract_line`].
//! [`LocationIndexedLine`] bundles these operations for a single geometry.
//!
//! The module also contains [`LineSnapper`] and [`GeometrySnapper`] that snap lines to a set of points, which is
//! used to clean up small misalignments between geometries before overlaying them.

use meridian_types::cartesian::{CartesianPoint2d, Point2};

use crate::error::MeridianError;

mod extract;
mod geometry;
mod index_of;
mod iterator;
mod length;
mod location;
mod snap;

pub use extract::extract_line;
pub use geometry::LinearGeometry;
pub use index_of::{index_of, index_of_after, index_of_line};
pub use iterator::{LinearIterator, LinearVertex};
pub use length::LengthLocationMap;
pub use location::LinearLocation;
pub use snap::{size_based_snap_tolerance, GeometrySnapper, LineSnapper};

/// Linear geometry indexed by [`LinearLocation`]s.
///
/// ```
/// use meridian::linref::{LinearGeometry, LocationIndexedLine};
/// use meridian::Point2;
///
/// let line = LocationIndexedLine::new(LinearGeometry::line(vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(10.0, 0.0),
/// ]));
///
/// let location = line.index_of(&Point2::new(3.0, 2.0));
/// assert_eq!(line.extract_point(&location).unwrap(), Point2::new(3.0, 0.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationIndexedLine {
    geometry: LinearGeometry,
}

impl LocationIndexedLine {
    /// Creates an indexed line.
    pub fn new(geometry: LinearGeometry) -> Self {
        Self { geometry }
    }

    /// The indexed geometry.
    pub fn geometry(&self) -> &LinearGeometry {
        &self.geometry
    }

    /// Point at the location.
    ///
    /// Returns [`MeridianError::InvalidLocation`] if the geometry does not have the part the location refers to.
    pub fn extract_point(&self, location: &LinearLocation) -> Result<Point2, MeridianError> {
        location
            .coordinate(&self.geometry)
            .ok_or_else(|| invalid_location(location))
    }

    /// Point at the location moved by `offset` perpendicular to the line. Positive offsets are to the left of
    /// the line direction, negative ones to the right.
    ///
    /// For a location at a vertex the direction of the segment ending at the vertex is used. Returns
    /// [`MeridianError::InvalidLocation`] if the location does not refer to a part of the geometry, or if a
    /// non-zero offset is requested on a zero-length segment.
    pub fn extract_point_offset(
        &self,
        location: &LinearLocation,
        offset: f64,
    ) -> Result<Point2, MeridianError> {
        let (start, end, fraction) = self
            .lowest_segment(location)
            .ok_or_else(|| invalid_location(location))?;

        let point = start.lerp(&end, fraction);
        if offset == 0.0 {
            return Ok(point);
        }

        let direction = end.sub(&start);
        let length = direction.magnitude();
        if length <= 0.0 {
            return Err(MeridianError::InvalidLocation(format!(
                "cannot offset a point on zero-length segment at {location:?}"
            )));
        }

        let ux = offset * direction.dx() / length;
        let uy = offset * direction.dy() / length;

        Ok(Point2::new(point.x() - uy, point.y() + ux))
    }

    /// Sub-line between two locations, see [`extract_line`].
    pub fn extract_line(&self, start: &LinearLocation, end: &LinearLocation) -> LinearGeometry {
        extract_line(&self.geometry, start, end)
    }

    /// Location of the closest point of the line, see [`index_of`].
    pub fn index_of(&self, point: &impl CartesianPoint2d<Num = f64>) -> LinearLocation {
        index_of(&self.geometry, point)
    }

    /// Location of the closest point after `min_location`, see [`index_of_after`].
    pub fn index_of_after(
        &self,
        point: &impl CartesianPoint2d<Num = f64>,
        min_location: &LinearLocation,
    ) -> LinearLocation {
        index_of_after(&self.geometry, point, min_location)
    }

    /// Start and end locations of a sub-line, see [`index_of_line`].
    pub fn index_of_line(&self, subline: &LinearGeometry) -> Option<[LinearLocation; 2]> {
        index_of_line(&self.geometry, subline)
    }

    /// Location of the start of the line.
    pub fn start_index(&self) -> LinearLocation {
        LinearLocation::start()
    }

    /// Location of the end of the line.
    pub fn end_index(&self) -> LinearLocation {
        LinearLocation::end_of(&self.geometry)
    }

    /// Returns true if the location refers to a point of the line.
    pub fn is_valid_index(&self, location: &LinearLocation) -> bool {
        location.is_valid(&self.geometry)
    }

    /// Nearest valid location, see [`LinearLocation::clamp`].
    pub fn clamp_index(&self, location: &LinearLocation) -> LinearLocation {
        location.clamp_to_geometry(&self.geometry)
    }

    /// Segment of the location with the fraction on it. Vertices are resolved to the end of the previous segment.
    fn lowest_segment(&self, location: &LinearLocation) -> Option<(Point2, Point2, f64)> {
        let part = self.geometry.part(location.part_index())?;
        match part.len() {
            0 => None,
            1 => Some((part[0], part[0], 0.0)),
            len => {
                let (index, fraction) = if location.is_vertex() && location.segment_index() > 0 {
                    (location.segment_index() - 1, 1.0)
                } else {
                    (location.segment_index(), location.segment_fraction())
                };

                if index > len - 2 {
                    Some((part[len - 2], part[len - 1], 1.0))
                } else {
                    Some((part[index], part[index + 1], fraction))
                }
            }
        }
    }
}

impl From<LinearGeometry> for LocationIndexedLine {
    fn from(value: LinearGeometry) -> Self {
        Self::new(value)
    }
}

fn invalid_location(location: &LinearLocation) -> MeridianError {
    MeridianError::InvalidLocation(format!("{location:?} does not refer to a part of the geometry"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn line() -> LocationIndexedLine {
        LocationIndexedLine::new(LinearGeometry::line(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ]))
    }

    fn loc(part: usize, segment: usize, fraction: f64) -> LinearLocation {
        LinearLocation::new(part, segment, fraction).unwrap()
    }

    #[test]
    fn points() {
        let line = line();
        assert_eq!(line.extract_point(&loc(0, 0, 0.5)).unwrap(), Point2::new(5.0, 0.0));
        assert_matches!(
            line.extract_point(&loc(1, 0, 0.0)),
            Err(MeridianError::InvalidLocation(_))
        );
    }

    #[test]
    fn offset_points() {
        let line = line();

        let left = line.extract_point_offset(&loc(0, 0, 0.5), 2.0).unwrap();
        assert_abs_diff_eq!(left, Point2::new(5.0, 2.0), epsilon = 1e-12);

        let right = line.extract_point_offset(&loc(0, 1, 0.5), -2.0).unwrap();
        assert_abs_diff_eq!(right, Point2::new(12.0, 5.0), epsilon = 1e-12);

        // The vertex between the segments uses the direction of the first one.
        let at_vertex = line.extract_point_offset(&loc(0, 1, 0.0), 1.0).unwrap();
        assert_abs_diff_eq!(at_vertex, Point2::new(10.0, 1.0), epsilon = 1e-12);

        let end = line.extract_point_offset(&line.end_index(), 1.0).unwrap();
        assert_abs_diff_eq!(end, Point2::new(9.0, 10.0), epsilon = 1e-12);
    }

    #[test]
    fn zero_length_offset() {
        let line = LocationIndexedLine::new(LinearGeometry::line(vec![Point2::new(1.0, 1.0)]));
        assert_eq!(
            line.extract_point_offset(&line.start_index(), 0.0).unwrap(),
            Point2::new(1.0, 1.0)
        );
        assert_matches!(
            line.extract_point_offset(&line.start_index(), 1.0),
            Err(MeridianError::InvalidLocation(_))
        );
    }

    #[test]
    fn index_round_trip() {
        let line = line();
        let start = line.index_of(&Point2::new(3.0, 1.0));
        let end = line.index_of(&Point2::new(11.0, 4.0));
        assert_eq!(start, loc(0, 0, 0.3));
        assert_eq!(end, loc(0, 1, 0.4));

        let subline = line.extract_line(&start, &end);
        assert_eq!(line.index_of_line(&subline), Some([start, end]));
        assert_eq!(line.index_of_after(&Point2::new(3.0, 1.0), &start), loc(0, 1, 0.1));
    }

    #[test]
    fn validity() {
        let line = line();
        assert_eq!(line.start_index(), LinearLocation::start());
        assert_eq!(line.end_index(), loc(0, 2, 0.0));
        assert!(line.is_valid_index(&loc(0, 1, 0.5)));
        assert!(!line.is_valid_index(&loc(0, 3, 0.0)));
        assert_eq!(line.clamp_index(&loc(0, 3, 0.5)), line.end_index());
    }
}
