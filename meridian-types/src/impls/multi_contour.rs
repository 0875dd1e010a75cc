use serde::{Deserialize, Serialize};

use crate::impls::contour::Contour;

/// A set of contours.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MultiContour<P>(Vec<Contour<P>>);

impl<P> MultiContour<P> {
    /// Creates a new multi contour from its parts.
    pub fn new(contours: Vec<Contour<P>>) -> Self {
        Self(contours)
    }

    /// Parts of the multi contour.
    pub fn parts(&self) -> &[Contour<P>] {
        &self.0
    }

    /// Consumes the multi contour returning its parts.
    pub fn into_parts(self) -> Vec<Contour<P>> {
        self.0
    }

    /// Returns true if there are no parts.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P> crate::multi_contour::MultiContour for MultiContour<P> {
    type Contour = Contour<P>;

    fn contours(&self) -> impl Iterator<Item = &Self::Contour> {
        self.0.iter()
    }
}

impl<P> From<Vec<Contour<P>>> for MultiContour<P> {
    fn from(value: Vec<Contour<P>>) -> Self {
        Self(value)
    }
}
