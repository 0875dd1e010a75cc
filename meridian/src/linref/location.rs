use std::cmp::Ordering;

use meridian_types::cartesian::Point2;
use meridian_types::Segment;

use crate::error::MeridianError;
use crate::linref::LinearGeometry;

/// Position of a point on a [`LinearGeometry`].
///
/// A location consists of the index of the part, the index of the segment in the part and the fraction of the
/// segment length from its start point, in range `[0, 1)`. A fraction of exactly `1` is normalized to the
/// start of the next segment, so every point of a line has a single location. The last vertex of a part is
/// addressed by the segment index equal to the index of the vertex and fraction `0`.
///
/// Locations are ordered by the part index, then the segment index, then the fraction, which is the order of
/// the points along the line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearLocation {
    part_index: usize,
    segment_index: usize,
    segment_fraction: f64,
}

impl LinearLocation {
    /// Creates a new location.
    ///
    /// Returns [`MeridianError::InvalidLocation`] if the fraction is not in range `[0, 1]`.
    pub fn new(
        part_index: usize,
        segment_index: usize,
        segment_fraction: f64,
    ) -> Result<Self, MeridianError> {
        if !(0.0..=1.0).contains(&segment_fraction) {
            return Err(MeridianError::InvalidLocation(format!(
                "segment fraction {segment_fraction} is out of [0, 1] range"
            )));
        }

        Ok(Self::normalized(part_index, segment_index, segment_fraction))
    }

    /// Constructs a location from a fraction that is known to be in `[0, 1]` range (or clamps it there).
    pub(crate) fn normalized(
        part_index: usize,
        segment_index: usize,
        segment_fraction: f64,
    ) -> Self {
        let segment_fraction = if segment_fraction.is_nan() {
            0.0
        } else {
            segment_fraction.clamp(0.0, 1.0)
        };

        if segment_fraction >= 1.0 {
            Self {
                part_index,
                segment_index: segment_index + 1,
                segment_fraction: 0.0,
            }
        } else {
            Self {
                part_index,
                segment_index,
                segment_fraction,
            }
        }
    }

    /// Location of the first point of any line.
    pub fn start() -> Self {
        Self::default()
    }

    /// Location of the last vertex of the last part of the geometry. For empty geometries it is the same as
    /// [`LinearLocation::start`].
    pub fn end_of(geometry: &LinearGeometry) -> Self {
        match geometry.part_count().checked_sub(1) {
            Some(last) => Self {
                part_index: last,
                segment_index: geometry.parts()[last].len().saturating_sub(1),
                segment_fraction: 0.0,
            },
            None => Self::start(),
        }
    }

    /// Index of the part.
    pub fn part_index(&self) -> usize {
        self.part_index
    }

    /// Index of the segment in the part.
    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    /// Fraction of the segment length from its start point.
    pub fn segment_fraction(&self) -> f64 {
        self.segment_fraction
    }

    /// Returns true if the location points at a vertex of the line.
    pub fn is_vertex(&self) -> bool {
        self.segment_fraction == 0.0
    }

    /// Point of the geometry at the location.
    ///
    /// Segment indices past the end of the part resolve to the last vertex of the part, whatever the fraction.
    /// Such locations are not rejected; use [`LinearLocation::is_valid`] to detect them. Returns `None` if the
    /// geometry has no such part or the part is empty.
    pub fn coordinate(&self, geometry: &LinearGeometry) -> Option<Point2> {
        let part = geometry.part(self.part_index)?;
        let last = part.len().checked_sub(1)?;
        if self.segment_index >= last {
            return Some(part[last]);
        }

        Some(
            part[self.segment_index].lerp(&part[self.segment_index + 1], self.segment_fraction),
        )
    }

    /// End points of the segment the location is on.
    ///
    /// The location of the last vertex of a part, and any segment index past it, resolves to the last segment of
    /// the part. A part with a single vertex gives a zero-length segment.
    pub fn segment(&self, geometry: &LinearGeometry) -> Option<(Point2, Point2)> {
        let part = geometry.part(self.part_index)?;
        match part.len() {
            0 => None,
            1 => Some((part[0], part[0])),
            len => {
                let index = self.segment_index.min(len - 2);
                Some((part[index], part[index + 1]))
            }
        }
    }

    /// Length of the segment the location is on, see [`LinearLocation::segment`].
    pub fn segment_length(&self, geometry: &LinearGeometry) -> f64 {
        self.segment(geometry)
            .map(|(start, end)| Segment(&start, &end).length())
            .unwrap_or(0.0)
    }

    /// Returns true if the location is the last vertex of its part.
    pub fn is_end_of_line(&self, geometry: &LinearGeometry) -> bool {
        geometry
            .part(self.part_index)
            .is_some_and(|part| self.segment_index + 1 >= part.len())
    }

    /// Returns true if the location points at an existing point of the geometry.
    pub fn is_valid(&self, geometry: &LinearGeometry) -> bool {
        let Some(part) = geometry.part(self.part_index) else {
            return false;
        };

        match part.len().checked_sub(1) {
            Some(last) => {
                self.segment_index < last || (self.segment_index == last && self.is_vertex())
            }
            None => false,
        }
    }

    /// Nearest valid location of the geometry. Locations past the end of a part are moved to the end of the
    /// part, and locations past the last part are moved to the end of the geometry.
    pub fn clamp_to_geometry(&self, geometry: &LinearGeometry) -> Self {
        let Some(part) = geometry.part(self.part_index) else {
            return Self::end_of(geometry);
        };

        let last = part.len().saturating_sub(1);
        if self.segment_index >= last {
            Self {
                part_index: self.part_index,
                segment_index: last,
                segment_fraction: 0.0,
            }
        } else {
            *self
        }
    }

    /// Moves the location to the nearest end of its segment if the distance to it is less than `min_distance`.
    pub fn snap_to_vertex(&self, geometry: &LinearGeometry, min_distance: f64) -> Self {
        if self.is_vertex() {
            return *self;
        }

        let length = self.segment_length(geometry);
        let to_start = self.segment_fraction * length;
        let to_end = length - to_start;

        if to_start <= to_end && to_start < min_distance {
            Self::normalized(self.part_index, self.segment_index, 0.0)
        } else if to_end <= to_start && to_end < min_distance {
            Self::normalized(self.part_index, self.segment_index, 1.0)
        } else {
            *self
        }
    }

    /// Returns true if both locations are on the same segment, including the case when one of them is the end
    /// vertex of the segment the other one is on.
    pub fn is_on_same_segment(&self, other: &Self) -> bool {
        if self.part_index != other.part_index {
            return false;
        }

        if self.segment_index == other.segment_index {
            return true;
        }

        (other.segment_index == self.segment_index + 1 && other.is_vertex())
            || (self.segment_index == other.segment_index + 1 && self.is_vertex())
    }

    /// Compares the location with the one given by its components.
    pub fn compare_location_values(
        &self,
        part_index: usize,
        segment_index: usize,
        segment_fraction: f64,
    ) -> Ordering {
        self.part_index
            .cmp(&part_index)
            .then(self.segment_index.cmp(&segment_index))
            .then(
                self.segment_fraction
                    .partial_cmp(&segment_fraction)
                    .unwrap_or(Ordering::Equal),
            )
    }
}

// The fraction is never NaN.
impl Eq for LinearLocation {}

impl PartialOrd for LinearLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LinearLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_location_values(other.part_index, other.segment_index, other.segment_fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn geometry() -> LinearGeometry {
        LinearGeometry::new(vec![
            vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), Point2::new(10.0, 10.0)],
            vec![Point2::new(20.0, 0.0), Point2::new(30.0, 0.0)],
        ])
    }

    fn loc(part: usize, segment: usize, fraction: f64) -> LinearLocation {
        LinearLocation::new(part, segment, fraction).unwrap()
    }

    #[test]
    fn fraction_validation() {
        assert_matches!(
            LinearLocation::new(0, 0, 1.5),
            Err(MeridianError::InvalidLocation(_))
        );
        assert_matches!(
            LinearLocation::new(0, 0, -0.1),
            Err(MeridianError::InvalidLocation(_))
        );
        assert_matches!(
            LinearLocation::new(0, 0, f64::NAN),
            Err(MeridianError::InvalidLocation(_))
        );

        let location = loc(0, 1, 1.0);
        assert_eq!(location.segment_index(), 2);
        assert_eq!(location.segment_fraction(), 0.0);
    }

    #[test]
    fn ordering() {
        let mut locations = vec![
            loc(1, 0, 0.0),
            loc(0, 1, 0.5),
            loc(0, 0, 0.7),
            loc(0, 1, 0.2),
            loc(0, 0, 0.0),
        ];
        locations.sort();

        assert_eq!(
            locations,
            vec![
                loc(0, 0, 0.0),
                loc(0, 0, 0.7),
                loc(0, 1, 0.2),
                loc(0, 1, 0.5),
                loc(1, 0, 0.0),
            ]
        );
        assert!(loc(0, 0, 1.0) == loc(0, 1, 0.0));
    }

    #[test]
    fn coordinates() {
        let geometry = geometry();
        assert_eq!(loc(0, 0, 0.5).coordinate(&geometry), Some(Point2::new(5.0, 0.0)));
        assert_eq!(loc(0, 1, 0.25).coordinate(&geometry), Some(Point2::new(10.0, 2.5)));
        assert_eq!(loc(0, 2, 0.0).coordinate(&geometry), Some(Point2::new(10.0, 10.0)));
        assert_eq!(loc(1, 0, 0.5).coordinate(&geometry), Some(Point2::new(25.0, 0.0)));
        assert_eq!(loc(2, 0, 0.0).coordinate(&geometry), None);

        let end = LinearLocation::end_of(&geometry);
        assert_eq!(end, loc(1, 1, 0.0));
        assert_eq!(end.coordinate(&geometry), Some(Point2::new(30.0, 0.0)));
    }

    #[test]
    fn segments() {
        let geometry = geometry();
        assert_eq!(
            loc(0, 2, 0.0).segment(&geometry),
            Some((Point2::new(10.0, 0.0), Point2::new(10.0, 10.0)))
        );
        assert_eq!(loc(0, 0, 0.3).segment_length(&geometry), 10.0);
        assert!(loc(0, 2, 0.0).is_end_of_line(&geometry));
        assert!(!loc(0, 1, 0.9).is_end_of_line(&geometry));
    }

    #[test]
    fn past_the_end_segment_resolves_to_last_vertex() {
        let geometry = geometry();
        let past = loc(0, 7, 0.5);

        assert!(!past.is_valid(&geometry));
        assert_eq!(past.coordinate(&geometry), Some(Point2::new(10.0, 10.0)));
        assert_eq!(
            past.segment(&geometry),
            Some((Point2::new(10.0, 0.0), Point2::new(10.0, 10.0)))
        );
    }

    #[test]
    fn validity_and_clamping() {
        let geometry = geometry();
        assert!(loc(0, 1, 0.5).is_valid(&geometry));
        assert!(loc(0, 2, 0.0).is_valid(&geometry));
        assert!(!loc(0, 2, 0.5).is_valid(&geometry));
        assert!(!loc(0, 5, 0.0).is_valid(&geometry));
        assert!(!loc(3, 0, 0.0).is_valid(&geometry));

        assert_eq!(loc(0, 5, 0.5).clamp_to_geometry(&geometry), loc(0, 2, 0.0));
        assert_eq!(loc(3, 0, 0.0).clamp_to_geometry(&geometry), loc(1, 1, 0.0));
        assert_eq!(loc(0, 1, 0.5).clamp_to_geometry(&geometry), loc(0, 1, 0.5));
    }

    #[test]
    fn snapping_to_vertex() {
        let geometry = geometry();
        assert_eq!(loc(0, 0, 0.05).snap_to_vertex(&geometry, 1.0), loc(0, 0, 0.0));
        assert_eq!(loc(0, 0, 0.95).snap_to_vertex(&geometry, 1.0), loc(0, 1, 0.0));
        assert_eq!(loc(0, 0, 0.5).snap_to_vertex(&geometry, 1.0), loc(0, 0, 0.5));
    }

    #[test]
    fn same_segment() {
        assert!(loc(0, 1, 0.2).is_on_same_segment(&loc(0, 1, 0.8)));
        assert!(loc(0, 1, 0.2).is_on_same_segment(&loc(0, 2, 0.0)));
        assert!(loc(0, 2, 0.0).is_on_same_segment(&loc(0, 1, 0.2)));
        assert!(!loc(0, 1, 0.2).is_on_same_segment(&loc(0, 2, 0.5)));
        assert!(!loc(0, 1, 0.2).is_on_same_segment(&loc(1, 1, 0.2)));
    }
}
