use meridian_types::Segment;

use crate::linref::{LinearGeometry, LinearIterator, LinearLocation};

/// Converts between [`LinearLocation`]s and lengths along a geometry.
#[derive(Debug, Clone, Copy)]
pub struct LengthLocationMap<'a> {
    geometry: &'a LinearGeometry,
}

impl<'a> LengthLocationMap<'a> {
    /// Creates a map for the geometry.
    pub fn new(geometry: &'a LinearGeometry) -> Self {
        Self { geometry }
    }

    /// Location at the given length from the start of the geometry. Negative lengths are measured from the end.
    ///
    /// A length that falls exactly on the end of a part resolves to the end of that part, not to the start of the
    /// next one. Lengths beyond the geometry resolve to its start or end.
    pub fn location_of(&self, length: f64) -> LinearLocation {
        let forward_length = if length < 0.0 {
            self.geometry.length() + length
        } else {
            length
        };

        self.location_forward(forward_length)
    }

    /// Length of the geometry from its start to the location.
    pub fn length_of(&self, location: &LinearLocation) -> f64 {
        let mut total = 0.0;

        let mut iter = LinearIterator::from_start(self.geometry);
        while iter.has_next() {
            let is_current = location.part_index() == iter.part_index()
                && location.segment_index() == iter.vertex_index();

            match (iter.segment_start(), iter.segment_end()) {
                (Some(start), Some(end)) => {
                    let segment_length = Segment(&start, &end).length();
                    if is_current {
                        return total + segment_length * location.segment_fraction();
                    }
                    total += segment_length;
                }
                _ if is_current => return total,
                _ => {}
            }

            iter.advance();
        }

        total
    }

    fn location_forward(&self, length: f64) -> LinearLocation {
        if length <= 0.0 {
            return LinearLocation::start();
        }

        let mut total = 0.0;

        let mut iter = LinearIterator::from_start(self.geometry);
        while iter.has_next() {
            match (iter.segment_start(), iter.segment_end()) {
                (Some(start), Some(end)) => {
                    let segment_length = Segment(&start, &end).length();
                    if total + segment_length > length {
                        return LinearLocation::normalized(
                            iter.part_index(),
                            iter.vertex_index(),
                            (length - total) / segment_length,
                        );
                    }
                    total += segment_length;
                }
                _ => {
                    if total == length {
                        return LinearLocation::normalized(
                            iter.part_index(),
                            iter.vertex_index(),
                            0.0,
                        );
                    }
                }
            }

            iter.advance();
        }

        LinearLocation::end_of(self.geometry)
    }
}
