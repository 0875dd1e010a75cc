use std::ops::ControlFlow;

use meridian_types::cartesian::Envelope;
use serde::{Deserialize, Serialize};

use crate::error::MeridianError;
use crate::index::{validate_envelope, SpatialIndex};

/// Configuration of a [`Quadtree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadtreeParams {
    /// Number of items a node holds before it is subdivided.
    pub max_items: usize,
    /// Maximum number of levels of the tree, including the root.
    pub max_depth: usize,
}

impl Default for QuadtreeParams {
    fn default() -> Self {
        Self {
            max_items: 8,
            max_depth: 16,
        }
    }
}

impl QuadtreeParams {
    /// Sets the number of items a node holds before it is subdivided.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Sets the maximum number of levels of the tree.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn validate(&self) -> Result<(), MeridianError> {
        if self.max_items == 0 || self.max_depth == 0 {
            Err(MeridianError::InvalidCapacity)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone)]
struct QuadNode<T> {
    envelope: Envelope,
    depth: usize,
    items: Vec<(Envelope, T)>,
    children: Option<Box<[QuadNode<T>; 4]>>,
}

impl<T> QuadNode<T> {
    fn new(envelope: Envelope, depth: usize) -> Self {
        Self {
            envelope,
            depth,
            items: vec![],
            children: None,
        }
    }

    fn is_empty_leaf(&self) -> bool {
        self.items.is_empty() && self.children.is_none()
    }

    fn depth(&self) -> usize {
        match &self.children {
            Some(children) => children
                .iter()
                .map(|child| child.depth())
                .max()
                .unwrap_or(self.depth),
            None => self.depth,
        }
    }

    fn insert(&mut self, envelope: Envelope, item: T, params: &QuadtreeParams) {
        if let Some(children) = &mut self.children {
            if let Some(child) = children
                .iter_mut()
                .find(|child| child.envelope.contains(&envelope))
            {
                child.insert(envelope, item, params);
                return;
            }
        }

        self.items.push((envelope, item));
        if self.children.is_none()
            && self.items.len() > params.max_items
            && self.depth < params.max_depth
        {
            self.subdivide(params);
        }
    }

    fn subdivide(&mut self, params: &QuadtreeParams) {
        let (x_min, y_min) = (self.envelope.x_min(), self.envelope.y_min());
        let (x_max, y_max) = (self.envelope.x_max(), self.envelope.y_max());
        let x_mid = (x_min + x_max) / 2.0;
        let y_mid = (y_min + y_max) / 2.0;
        let depth = self.depth + 1;

        self.children = Some(Box::new([
            QuadNode::new(Envelope::new(x_min, y_min, x_mid, y_mid), depth),
            QuadNode::new(Envelope::new(x_mid, y_min, x_max, y_mid), depth),
            QuadNode::new(Envelope::new(x_min, y_mid, x_mid, y_max), depth),
            QuadNode::new(Envelope::new(x_mid, y_mid, x_max, y_max), depth),
        ]));

        log::trace!("Quadtree node at depth {} is subdivided", self.depth);

        for (envelope, item) in std::mem::take(&mut self.items) {
            self.insert(envelope, item, params);
        }
    }

    fn remove(&mut self, envelope: &Envelope, item: &T) -> bool
    where
        T: PartialEq,
    {
        let removed = if let Some(position) = self
            .items
            .iter()
            .position(|(entry_envelope, entry)| entry_envelope == envelope && entry == item)
        {
            self.items.remove(position);
            true
        } else if let Some(children) = &mut self.children {
            children
                .iter_mut()
                .filter(|child| child.envelope.contains(envelope))
                .any(|child| child.remove(envelope, item))
        } else {
            false
        };

        if removed
            && self
                .children
                .as_ref()
                .is_some_and(|children| children.iter().all(|child| child.is_empty_leaf()))
        {
            self.children = None;
        }

        removed
    }

    fn query<'a, F>(&'a self, envelope: &Envelope, visit: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&'a T) -> ControlFlow<()>,
    {
        for (entry_envelope, item) in &self.items {
            if entry_envelope.intersects(envelope) {
                visit(item)?;
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.envelope.intersects(envelope) {
                    child.query(envelope, visit)?;
                }
            }
        }

        ControlFlow::Continue(())
    }
}

/// Region quadtree over a fixed extent.
///
/// Each item is stored in the deepest node whose quadrant fully contains the item envelope. A node is subdivided
/// into four equal quadrants when it holds more than `max_items` items, unless it is already at `max_depth`.
/// Items that are not contained in the extent are kept in the root node.
///
/// Points are stored as degenerate envelopes, see [`Envelope::from_point`].
#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    root: QuadNode<T>,
    params: QuadtreeParams,
    len: usize,
}

impl<T> Quadtree<T> {
    /// Creates an empty quadtree covering the given extent.
    pub fn new(extent: Envelope, params: QuadtreeParams) -> Result<Self, MeridianError> {
        validate_envelope(&extent)?;
        params.validate()?;

        Ok(Self {
            root: QuadNode::new(extent, 1),
            params,
            len: 0,
        })
    }

    /// Extent covered by the quadrants of the tree.
    pub fn extent(&self) -> Envelope {
        self.root.envelope
    }

    /// Parameters of the tree.
    pub fn params(&self) -> QuadtreeParams {
        self.params
    }

    /// Number of items in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels of the tree. A tree that was never subdivided has depth `1`.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl<T> SpatialIndex<T> for Quadtree<T> {
    fn insert(&mut self, envelope: Envelope, item: T) -> Result<(), MeridianError> {
        validate_envelope(&envelope)?;
        self.root.insert(envelope, item, &self.params);
        self.len += 1;

        Ok(())
    }

    fn remove(&mut self, envelope: &Envelope, item: &T) -> bool
    where
        T: PartialEq,
    {
        if !envelope.is_valid() {
            return false;
        }

        let removed = self.root.remove(envelope, item);
        if removed {
            self.len -= 1;
        }

        removed
    }

    fn query<'a, F>(&'a self, envelope: &Envelope, mut visit: F) -> ControlFlow<()>
    where
        T: 'a,
        F: FnMut(&'a T) -> ControlFlow<()>,
    {
        self.root.query(envelope, &mut visit)
    }
}
