use meridian_types::cartesian::Point2;

use crate::linref::{LinearGeometry, LinearLocation};

/// Vertex of a linear geometry produced by the [`LinearIterator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearVertex {
    /// Index of the part.
    pub part_index: usize,
    /// Index of the vertex in the part.
    pub vertex_index: usize,
    /// Coordinates of the vertex.
    pub point: Point2,
    /// True if this is the last vertex of the part.
    pub is_end_of_part: bool,
}

/// Cursor over the vertices of a [`LinearGeometry`].
///
/// The cursor walks the parts in order and the vertices of each part in order. At every position it exposes
/// the segment starting at the current vertex, which does not exist for the last vertex of a part. Empty parts
/// are skipped.
#[derive(Debug, Clone)]
pub struct LinearIterator<'a> {
    geometry: &'a LinearGeometry,
    part_index: usize,
    vertex_index: usize,
}

impl<'a> LinearIterator<'a> {
    /// Cursor at the given vertex.
    pub fn new(geometry: &'a LinearGeometry, part_index: usize, vertex_index: usize) -> Self {
        let mut iter = Self {
            geometry,
            part_index,
            vertex_index,
        };
        iter.skip_exhausted_parts();
        iter
    }

    /// Cursor at the first vertex of the geometry.
    pub fn from_start(geometry: &'a LinearGeometry) -> Self {
        Self::new(geometry, 0, 0)
    }

    /// Cursor at the first vertex not before the location: the start of the location's segment if the location
    /// is a vertex, or the end of the segment otherwise.
    pub fn from_location(geometry: &'a LinearGeometry, location: &LinearLocation) -> Self {
        let vertex_index = if location.segment_fraction() > 0.0 {
            location.segment_index() + 1
        } else {
            location.segment_index()
        };

        Self::new(geometry, location.part_index(), vertex_index)
    }

    /// Returns true if the cursor points at a vertex.
    pub fn has_next(&self) -> bool {
        self.part_index < self.geometry.part_count()
    }

    /// Moves the cursor to the next vertex.
    pub fn advance(&mut self) {
        if !self.has_next() {
            return;
        }

        self.vertex_index += 1;
        self.skip_exhausted_parts();
    }

    /// Index of the current part.
    pub fn part_index(&self) -> usize {
        self.part_index
    }

    /// Index of the current vertex in its part.
    pub fn vertex_index(&self) -> usize {
        self.vertex_index
    }

    /// Returns true if the current vertex is the last one in its part.
    pub fn is_end_of_part(&self) -> bool {
        self.current_part()
            .is_some_and(|part| self.vertex_index + 1 >= part.len())
    }

    /// Current vertex.
    pub fn segment_start(&self) -> Option<Point2> {
        self.current_part()?.get(self.vertex_index).copied()
    }

    /// Vertex following the current one in the same part.
    pub fn segment_end(&self) -> Option<Point2> {
        self.current_part()?.get(self.vertex_index + 1).copied()
    }

    fn current_part(&self) -> Option<&'a [Point2]> {
        self.geometry.part(self.part_index)
    }

    fn skip_exhausted_parts(&mut self) {
        while let Some(part) = self.current_part() {
            if self.vertex_index < part.len() {
                break;
            }

            self.part_index += 1;
            self.vertex_index = 0;
        }
    }
}

impl Iterator for LinearIterator<'_> {
    type Item = LinearVertex;

    fn next(&mut self) -> Option<Self::Item> {
        let vertex = LinearVertex {
            part_index: self.part_index,
            vertex_index: self.vertex_index,
            point: self.segment_start()?,
            is_end_of_part: self.is_end_of_part(),
        };
        self.advance();

        Some(vertex)
    }
}
