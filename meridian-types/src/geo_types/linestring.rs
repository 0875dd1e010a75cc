use geo_types::{Coord, CoordNum, LineString};

use crate::contour::Contour;

impl<T: CoordNum> Contour for LineString<T> {
    type Point = Coord<T>;

    /// A line string is a closed contour if it has more than two points and its last point repeats the first
    /// one. Shorter line strings are always open, even if their points are equal.
    fn is_closed(&self) -> bool {
        self.0.len() > 2 && LineString::is_closed(self)
    }

    fn iter_points(&self) -> impl Iterator<Item = &'_ Self::Point> {
        let count = if Contour::is_closed(self) {
            self.0.len() - 1
        } else {
            self.0.len()
        };

        self.0[..count].iter()
    }
}
