use meridian_types::cartesian::{CartesianPoint2d, Envelope, Point2};
use meridian_types::contour::Contour;
use meridian_types::multi_contour::MultiContour;
use meridian_types::Segment;

/// Linear geometry addressed by [`LinearLocation`](super::LinearLocation)s: an ordered list of parts, each
/// being a sequence of vertices.
///
/// Unlike [`Contour`], the parts store the closing vertex of closed lines explicitly, so a location can point at
/// any segment of the line by its index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearGeometry {
    parts: Vec<Vec<Point2>>,
}

impl LinearGeometry {
    /// Creates a geometry from its parts.
    pub fn new(parts: Vec<Vec<Point2>>) -> Self {
        Self { parts }
    }

    /// Geometry with a single part.
    pub fn line(points: Vec<Point2>) -> Self {
        Self {
            parts: vec![points],
        }
    }

    /// Copies the vertices of the contour. For closed contours the first vertex is repeated at the end.
    pub fn from_contour<C>(contour: &C) -> Self
    where
        C: Contour,
        C::Point: CartesianPoint2d<Num = f64>,
    {
        Self::line(contour_points(contour))
    }

    /// Copies the vertices of all contours of the multi contour, one part per contour.
    pub fn from_multi_contour<M>(multi_contour: &M) -> Self
    where
        M: MultiContour,
        <M::Contour as Contour>::Point: CartesianPoint2d<Num = f64>,
    {
        Self {
            parts: multi_contour.contours().map(contour_points).collect(),
        }
    }

    /// Parts of the geometry.
    pub fn parts(&self) -> &[Vec<Point2>] {
        &self.parts
    }

    /// Part with the given index.
    pub fn part(&self, index: usize) -> Option<&[Point2]> {
        self.parts.get(index).map(|part| &part[..])
    }

    /// Number of parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if the geometry has no vertices.
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| part.is_empty())
    }

    /// Vertex with the given index in the given part.
    pub fn vertex(&self, part_index: usize, vertex_index: usize) -> Option<Point2> {
        self.parts.get(part_index)?.get(vertex_index).copied()
    }

    /// First vertex of the geometry.
    pub fn first_vertex(&self) -> Option<Point2> {
        self.parts.iter().flatten().next().copied()
    }

    /// Last vertex of the geometry.
    pub fn last_vertex(&self) -> Option<Point2> {
        self.parts.iter().rev().flat_map(|part| part.iter().rev()).next().copied()
    }

    /// Returns true if the part has at least two vertices and its first and last vertices are equal.
    pub fn is_closed_part(&self, index: usize) -> bool {
        self.part(index).is_some_and(is_closed)
    }

    /// Total length of all parts.
    pub fn length(&self) -> f64 {
        self.parts
            .iter()
            .flat_map(|part| part.windows(2))
            .map(|pair| Segment(&pair[0], &pair[1]).length())
            .sum()
    }

    /// Bounding envelope of all vertices.
    pub fn envelope(&self) -> Envelope {
        Envelope::from_points(self.parts.iter().flatten())
    }

    /// Geometry with the order of the parts and of the vertices in each part reversed.
    pub fn reverse(&self) -> Self {
        Self {
            parts: self
                .parts
                .iter()
                .rev()
                .map(|part| part.iter().rev().copied().collect())
                .collect(),
        }
    }

    /// Consumes the geometry returning its parts.
    pub fn into_parts(self) -> Vec<Vec<Point2>> {
        self.parts
    }
}

impl From<Vec<Point2>> for LinearGeometry {
    fn from(value: Vec<Point2>) -> Self {
        Self::line(value)
    }
}

impl From<Vec<Vec<Point2>>> for LinearGeometry {
    fn from(value: Vec<Vec<Point2>>) -> Self {
        Self::new(value)
    }
}

pub(crate) fn is_closed(points: &[Point2]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => points.len() > 1 && first.equal(last),
        _ => false,
    }
}

fn contour_points<C>(contour: &C) -> Vec<Point2>
where
    C: Contour,
    C::Point: CartesianPoint2d<Num = f64>,
{
    contour
        .iter_points_closing()
        .map(Point2::from_point)
        .collect()
}
