use std::ops::ControlFlow;

use meridian_types::cartesian::Envelope;

use crate::error::MeridianError;
use crate::index::{Quadtree, QuadtreeParams, SpatialIndex};

/// Source of objects indexed by an [`IdQuadtree`].
pub trait ObjectLookup {
    /// Type of the objects.
    type Object;

    /// Returns the object with the given id, or `None` if there is no such object.
    fn object(&self, id: u64) -> Option<&Self::Object>;

    /// Bounding envelope of the object.
    fn envelope(&self, object: &Self::Object) -> Envelope;
}

/// Quadtree that stores only object ids and resolves envelopes and query results through an [`ObjectLookup`].
///
/// The envelope of an object must not change while the object is in the index. To change it, remove the id
/// first and insert it again after the change.
#[derive(Debug, Clone)]
pub struct IdQuadtree<L> {
    lookup: L,
    tree: Quadtree<u64>,
}

impl<L: ObjectLookup> IdQuadtree<L> {
    /// Creates an empty index covering the given extent.
    pub fn new(lookup: L, extent: Envelope, params: QuadtreeParams) -> Result<Self, MeridianError> {
        Ok(Self {
            lookup,
            tree: Quadtree::new(extent, params)?,
        })
    }

    /// Object lookup of the index.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Number of ids in the index.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Adds the object with the given id to the index.
    ///
    /// Returns [`MeridianError::UnknownId`] if the lookup does not know the id.
    pub fn insert(&mut self, id: u64) -> Result<(), MeridianError> {
        let envelope = self.envelope_of(id).ok_or(MeridianError::UnknownId(id))?;
        self.tree.insert(envelope, id)
    }

    /// Removes the id from the index. Returns `false` if the lookup does not know the id or it is not indexed.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.envelope_of(id) {
            Some(envelope) => self.tree.remove(&envelope, &id),
            None => false,
        }
    }

    /// Calls `visit` for every indexed object whose envelope intersects the given one.
    pub fn query<'a, F>(&'a self, envelope: &Envelope, mut visit: F) -> ControlFlow<()>
    where
        L::Object: 'a,
        F: FnMut(&'a L::Object) -> ControlFlow<()>,
    {
        self.tree
            .query(envelope, |id| match self.lookup.object(*id) {
                Some(object) => visit(object),
                None => ControlFlow::Continue(()),
            })
    }

    /// Ids of all indexed objects whose envelopes intersect the given one.
    pub fn query_ids(&self, envelope: &Envelope) -> Vec<u64> {
        self.tree
            .query_collect(envelope)
            .into_iter()
            .copied()
            .collect()
    }

    /// Releases the object lookup.
    pub fn into_lookup(self) -> L {
        self.lookup
    }

    fn envelope_of(&self, id: u64) -> Option<Envelope> {
        self.lookup
            .object(id)
            .map(|object| self.lookup.envelope(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq)]
    struct Station {
        name: &'static str,
        x: f64,
        y: f64,
    }

    struct Stations(HashMap<u64, Station>);

    impl ObjectLookup for Stations {
        type Object = Station;

        fn object(&self, id: u64) -> Option<&Station> {
            self.0.get(&id)
        }

        fn envelope(&self, object: &Station) -> Envelope {
            Envelope::new(object.x, object.y, object.x, object.y)
        }
    }

    fn stations() -> Stations {
        let mut map = HashMap::new();
        map.insert(1, Station { name: "north", x: 10.0, y: 90.0 });
        map.insert(2, Station { name: "south", x: 10.0, y: 5.0 });
        map.insert(3, Station { name: "east", x: 95.0, y: 50.0 });
        Stations(map)
    }

    fn index() -> IdQuadtree<Stations> {
        IdQuadtree::new(
            stations(),
            Envelope::new(0.0, 0.0, 100.0, 100.0),
            QuadtreeParams::default().with_max_items(1),
        )
        .unwrap()
    }

    #[test]
    fn query_resolves_objects() {
        let mut index = index();
        for id in 1..=3 {
            index.insert(id).unwrap();
        }

        let mut names = vec![];
        let _ = index.query(&Envelope::new(0.0, 0.0, 50.0, 100.0), |station| {
            names.push(station.name);
            ControlFlow::Continue(())
        });
        names.sort();
        assert_eq!(names, vec!["north", "south"]);

        let mut ids = index.query_ids(&Envelope::new(90.0, 40.0, 100.0, 60.0));
        ids.sort();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn unknown_ids() {
        let mut index = index();
        assert_matches!(index.insert(42), Err(MeridianError::UnknownId(42)));
        assert!(!index.remove(42));
        assert!(index.is_empty());
    }

    #[test]
    fn remove() {
        let mut index = index();
        index.insert(1).unwrap();
        index.insert(2).unwrap();

        assert!(index.remove(1));
        assert!(!index.remove(1));
        assert!(!index.remove(3));
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.query_ids(&Envelope::new(0.0, 0.0, 100.0, 100.0)),
            vec![2]
        );
    }
}
