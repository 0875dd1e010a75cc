//! Spatial indices: containers that find stored items by their bounding [`Envelope`]s.
//!
//! All indices implement the [`SpatialIndex`] trait. Items are visited by closures returning
//! [`ControlFlow`], so a query can be stopped as soon as the caller has found what it needs.

use std::ops::ControlFlow;

use meridian_types::cartesian::Envelope;

use crate::error::MeridianError;

mod id_quadtree;
mod quadtree;
mod rtree;

#[cfg(test)]
mod test_utils;

pub use id_quadtree::{IdQuadtree, ObjectLookup};
pub use quadtree::{Quadtree, QuadtreeParams};
pub use rtree::{IntersectingIter, RTree, RTreeParams};

/// Container of items with bounding envelopes supporting envelope queries.
pub trait SpatialIndex<T> {
    /// Adds the item with the given envelope to the index.
    ///
    /// Returns [`MeridianError::InvalidEnvelope`] if the envelope is empty or not finite. The index is not
    /// modified in this case.
    fn insert(&mut self, envelope: Envelope, item: T) -> Result<(), MeridianError>;

    /// Removes the item stored with exactly the given envelope. Returns `false` if there is no such item.
    fn remove(&mut self, envelope: &Envelope, item: &T) -> bool
    where
        T: PartialEq;

    /// Calls `visit` for every item whose envelope intersects the given one.
    ///
    /// Returns [`ControlFlow::Break`] if the traversal was stopped by the visitor.
    fn query<'a, F>(&'a self, envelope: &Envelope, visit: F) -> ControlFlow<()>
    where
        T: 'a,
        F: FnMut(&'a T) -> ControlFlow<()>;

    /// Collects all the items whose envelopes intersect the given one.
    fn query_collect<'a>(&'a self, envelope: &Envelope) -> Vec<&'a T>
    where
        T: 'a,
    {
        let mut result = vec![];
        let _ = self.query(envelope, |item| {
            result.push(item);
            ControlFlow::Continue(())
        });

        result
    }
}

pub(crate) fn validate_envelope(envelope: &Envelope) -> Result<(), MeridianError> {
    if envelope.is_valid() {
        Ok(())
    } else {
        Err(MeridianError::InvalidEnvelope)
    }
}
