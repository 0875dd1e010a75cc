use meridian_types::cartesian::{CartesianPoint2d, Point2};

use crate::linref::{LinearGeometry, LinearIterator, LinearLocation};

/// Extracts the part of the geometry between two locations.
///
/// If `end` is before `start`, the result is the reversed line between `end` and `start`. Locations that are
/// not vertices are interpolated. Repeated points are dropped, and a part that collapses to a single point is
/// returned as a two-point line.
pub fn extract_line(
    geometry: &LinearGeometry,
    start: &LinearLocation,
    end: &LinearLocation,
) -> LinearGeometry {
    if end < start {
        extract_forward(geometry, end, start).reverse()
    } else {
        extract_forward(geometry, start, end)
    }
}

fn extract_forward(
    geometry: &LinearGeometry,
    start: &LinearLocation,
    end: &LinearLocation,
) -> LinearGeometry {
    let mut builder = PartsBuilder::default();

    if !start.is_vertex() {
        if let Some(point) = start.coordinate(geometry) {
            builder.add(point);
        }
    }

    let mut iter = LinearIterator::from_location(geometry, start);
    while iter.has_next() {
        if end.compare_location_values(iter.part_index(), iter.vertex_index(), 0.0)
            == std::cmp::Ordering::Less
        {
            break;
        }

        if let Some(point) = iter.segment_start() {
            builder.add(point);
        }
        if iter.is_end_of_part() {
            builder.end_part();
        }

        iter.advance();
    }

    if !end.is_vertex() {
        if let Some(point) = end.coordinate(geometry) {
            builder.add(point);
        }
    }

    builder.build()
}

#[derive(Debug, Default)]
struct PartsBuilder {
    parts: Vec<Vec<Point2>>,
    current: Vec<Point2>,
}

impl PartsBuilder {
    fn add(&mut self, point: Point2) {
        if self.current.last().is_some_and(|last| last.equal(&point)) {
            return;
        }

        self.current.push(point);
    }

    fn end_part(&mut self) {
        let mut part = std::mem::take(&mut self.current);
        match part.len() {
            0 => return,
            1 => part.push(part[0]),
            _ => {}
        }

        self.parts.push(part);
    }

    fn build(mut self) -> LinearGeometry {
        self.end_part();
        LinearGeometry::new(self.parts)
    }
}
