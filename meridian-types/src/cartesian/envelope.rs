use crate::cartesian::impls::Point2;
use crate::cartesian::traits::CartesianPoint2d;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle.
///
/// An empty envelope is represented by all-NaN coordinates ([`Envelope::EMPTY`]) rather than by `min > max`. A
/// non-empty envelope always satisfies `x_min <= x_max` and `y_min <= y_max`; constructors order the corners.
///
/// Envelopes are cheap `Copy` values. Operations with an empty envelope behave as operations with an empty set:
/// it intersects and contains nothing, and is the identity of [`Envelope::union`].
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Envelope {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => true,
            (false, false) => {
                self.x_min == other.x_min
                    && self.y_min == other.y_min
                    && self.x_max == other.x_max
                    && self.y_max == other.y_max
            }
            _ => false,
        }
    }
}

impl Envelope {
    /// Envelope that contains nothing.
    pub const EMPTY: Self = Self {
        x_min: f64::NAN,
        y_min: f64::NAN,
        x_max: f64::NAN,
        y_max: f64::NAN,
    };

    /// Creates an envelope spanning the two given corners in any order.
    ///
    /// If any of the values is NaN, the empty envelope is returned.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        if x1.is_nan() || y1.is_nan() || x2.is_nan() || y2.is_nan() {
            return Self::EMPTY;
        }

        Self {
            x_min: x1.min(x2),
            y_min: y1.min(y2),
            x_max: x1.max(x2),
            y_max: y1.max(y2),
        }
    }

    /// Degenerate envelope of a single point.
    pub fn from_point(p: &impl CartesianPoint2d<Num = f64>) -> Self {
        Self::new(p.x(), p.y(), p.x(), p.y())
    }

    /// Envelope of a segment between the two points.
    pub fn from_segment(
        p0: &impl CartesianPoint2d<Num = f64>,
        p1: &impl CartesianPoint2d<Num = f64>,
    ) -> Self {
        Self::new(p0.x(), p0.y(), p1.x(), p1.y())
    }

    /// Smallest envelope containing all the points. Empty if the iterator is empty.
    pub fn from_points<'a, P: CartesianPoint2d<Num = f64> + 'a>(
        points: impl IntoIterator<Item = &'a P>,
    ) -> Self {
        let mut envelope = Self::EMPTY;
        for p in points {
            envelope.expand_to_include_point(p);
        }

        envelope
    }

    /// Returns true if the envelope is empty.
    pub fn is_empty(&self) -> bool {
        self.x_min.is_nan()
    }

    /// Returns true if the envelope is not empty and all its coordinates are finite.
    ///
    /// Only valid envelopes can be stored in spatial indices.
    pub fn is_valid(&self) -> bool {
        !self.is_empty()
            && self.x_min.is_finite()
            && self.y_min.is_finite()
            && self.x_max.is_finite()
            && self.y_max.is_finite()
    }

    /// Minimum x coordinate. NaN for empty envelopes.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Maximum x coordinate. NaN for empty envelopes.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Minimum y coordinate. NaN for empty envelopes.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Maximum y coordinate. NaN for empty envelopes.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Width of the envelope, `0` for empty envelopes.
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.x_max - self.x_min
        }
    }

    /// Height of the envelope, `0` for empty envelopes.
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.y_max - self.y_min
        }
    }

    /// Area of the envelope, `0` for empty envelopes.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Smaller of width and height.
    pub fn min_extent(&self) -> f64 {
        self.width().min(self.height())
    }

    /// Center point of the envelope, `None` for empty envelopes.
    pub fn center(&self) -> Option<Point2> {
        if self.is_empty() {
            return None;
        }

        Some(Point2::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        ))
    }

    /// Returns true if the two envelopes have at least one common point (touching counts).
    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        other.x_min <= self.x_max
            && other.x_max >= self.x_min
            && other.y_min <= self.y_max
            && other.y_max >= self.y_min
    }

    /// Returns true if the point is inside of the envelope or on its boundary.
    pub fn intersects_point(&self, p: &impl CartesianPoint2d<Num = f64>) -> bool {
        !self.is_empty()
            && p.x() >= self.x_min
            && p.x() <= self.x_max
            && p.y() >= self.y_min
            && p.y() <= self.y_max
    }

    /// Returns true if the `other` envelope lies completely inside of this one (boundaries may touch).
    ///
    /// Nothing contains an empty envelope and an empty envelope contains nothing.
    pub fn contains(&self, other: &Envelope) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
    }

    /// Same as [`Envelope::intersects_point`].
    pub fn contains_point(&self, p: &impl CartesianPoint2d<Num = f64>) -> bool {
        self.intersects_point(p)
    }

    /// Expands the envelope in place so that it includes the `other` one.
    pub fn expand_to_include(&mut self, other: &Envelope) {
        if other.is_empty() {
            return;
        }

        if self.is_empty() {
            *self = *other;
            return;
        }

        self.x_min = self.x_min.min(other.x_min);
        self.y_min = self.y_min.min(other.y_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_max = self.y_max.max(other.y_max);
    }

    /// Expands the envelope in place so that it includes the point.
    pub fn expand_to_include_point(&mut self, p: &impl CartesianPoint2d<Num = f64>) {
        self.expand_to_include(&Self::from_point(p));
    }

    /// Grows (or shrinks with a negative distance) the envelope by the given distance on every side.
    ///
    /// Shrinking by more than half of the extent makes the envelope empty.
    pub fn expand_by(&mut self, distance: f64) {
        if self.is_empty() {
            return;
        }

        self.x_min -= distance;
        self.y_min -= distance;
        self.x_max += distance;
        self.y_max += distance;

        if self.x_min > self.x_max || self.y_min > self.y_max || distance.is_nan() {
            *self = Self::EMPTY;
        }
    }

    /// Smallest envelope containing both envelopes.
    pub fn union(&self, other: &Envelope) -> Self {
        let mut result = *self;
        result.expand_to_include(other);
        result
    }

    /// Common part of two envelopes, or the empty envelope if they don't intersect.
    pub fn intersection(&self, other: &Envelope) -> Self {
        if !self.intersects(other) {
            return Self::EMPTY;
        }

        Self {
            x_min: self.x_min.max(other.x_min),
            y_min: self.y_min.max(other.y_min),
            x_max: self.x_max.min(other.x_max),
            y_max: self.y_max.min(other.y_max),
        }
    }

    /// Area by which this envelope would grow if it was expanded to include the `other` one.
    pub fn enlargement(&self, other: &Envelope) -> f64 {
        self.union(other).area() - self.area()
    }
}

impl FromIterator<Envelope> for Envelope {
    fn from_iter<T: IntoIterator<Item = Envelope>>(iter: T) -> Self {
        let mut result = Self::EMPTY;
        for envelope in iter {
            result.expand_to_include(&envelope);
        }

        result
    }
}
