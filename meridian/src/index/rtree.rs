use std::iter::Zip;
use std::ops::ControlFlow;
use std::slice::Iter;

use meridian_types::cartesian::Envelope;
use serde::{Deserialize, Serialize};

use crate::error::MeridianError;
use crate::index::{validate_envelope, SpatialIndex};

type NodeId = usize;

/// Configuration of an [`RTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RTreeParams {
    /// Maximum number of entries (items in a leaf or children of a branch) a node can hold before it is split.
    pub max_entries: usize,
}

impl Default for RTreeParams {
    fn default() -> Self {
        Self { max_entries: 10 }
    }
}

impl RTreeParams {
    /// Smallest allowed value of `max_entries`.
    pub const MIN_ENTRIES: usize = 2;

    /// Sets maximum number of entries per node.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    fn validate(&self) -> Result<(), MeridianError> {
        if self.max_entries < Self::MIN_ENTRIES {
            Err(MeridianError::InvalidCapacity)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone)]
enum Node<T> {
    Leaf {
        envelope: Envelope,
        envelopes: Vec<Envelope>,
        items: Vec<T>,
    },
    Branch {
        envelope: Envelope,
        children: Vec<NodeId>,
    },
}

impl<T> Node<T> {
    fn empty_leaf() -> Self {
        Self::Leaf {
            envelope: Envelope::EMPTY,
            envelopes: vec![],
            items: vec![],
        }
    }

    fn envelope(&self) -> &Envelope {
        match self {
            Node::Leaf { envelope, .. } | Node::Branch { envelope, .. } => envelope,
        }
    }

    fn set_envelope(&mut self, value: Envelope) {
        match self {
            Node::Leaf { envelope, .. } | Node::Branch { envelope, .. } => *envelope = value,
        }
    }

    fn expand(&mut self, other: &Envelope) {
        match self {
            Node::Leaf { envelope, .. } | Node::Branch { envelope, .. } => {
                envelope.expand_to_include(other)
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Node::Leaf { items, .. } => items.len(),
            Node::Branch { children, .. } => children.len(),
        }
    }

    fn push_entry(&mut self, entry_envelope: Envelope, item: T) {
        if let Node::Leaf {
            envelope,
            envelopes,
            items,
        } = self
        {
            envelope.expand_to_include(&entry_envelope);
            envelopes.push(entry_envelope);
            items.push(item);
        }
    }

    fn insert_child(&mut self, position: usize, child: NodeId) {
        if let Node::Branch { children, .. } = self {
            children.insert(position, child);
        }
    }

    fn remove_child(&mut self, child: NodeId) {
        if let Node::Branch { children, .. } = self {
            children.retain(|&id| id != child);
        }
    }
}

/// R-tree spatial index.
///
/// Nodes are stored in an arena owned by the tree and refer to each other by index. Leaves keep the envelopes of
/// their items in a vector parallel to the items.
///
/// When a node overflows, it is split in the middle of its entry list: the first half (rounded up) stays in the
/// node and the rest goes to a new sibling, which is placed right after the node in the parent. No spatial
/// heuristic is applied.
///
/// Envelope of every node is the union of the envelopes of its entries, so the envelope of the root covers all
/// the items in the tree.
#[derive(Debug, Clone)]
pub struct RTree<T> {
    nodes: Vec<Node<T>>,
    free: Vec<NodeId>,
    root: NodeId,
    params: RTreeParams,
    len: usize,
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self::with_valid_params(RTreeParams::default())
    }
}

impl<T> RTree<T> {
    /// Creates an empty tree.
    ///
    /// Returns [`MeridianError::InvalidCapacity`] if `max_entries` is smaller than [`RTreeParams::MIN_ENTRIES`].
    pub fn new(params: RTreeParams) -> Result<Self, MeridianError> {
        params.validate()?;
        Ok(Self::with_valid_params(params))
    }

    fn with_valid_params(params: RTreeParams) -> Self {
        Self {
            nodes: vec![Node::empty_leaf()],
            free: vec![],
            root: 0,
            params,
            len: 0,
        }
    }

    /// Parameters of the tree.
    pub fn params(&self) -> RTreeParams {
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

    /// Envelope of all the items in the tree. Empty for an empty tree.
    pub fn envelope(&self) -> Envelope {
        *self.nodes[self.root].envelope()
    }

    /// Number of levels in the tree. A tree consisting of a single leaf has depth `1`.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut id = self.root;
        while let Node::Branch { children, .. } = &self.nodes[id] {
            match children.first() {
                Some(&child) => {
                    id = child;
                    depth += 1;
                }
                None => break,
            }
        }

        depth
    }

    /// Iterates over all the items in the tree with their envelopes, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Envelope, &T)> + '_ {
        self.nodes.iter().flat_map(|node| match node {
            Node::Leaf {
                envelopes, items, ..
            } => envelopes.iter().zip(items.iter()),
            Node::Branch { .. } => {
                let envelopes: &[Envelope] = Default::default();
                let items: &[T] = Default::default();
                envelopes.iter().zip(items.iter())
            }
        })
    }

    /// Lazy iterator over the items whose envelopes intersect the given one.
    ///
    /// Visits the items in the same order as [`SpatialIndex::query`].
    pub fn iter_intersecting(&self, envelope: &Envelope) -> IntersectingIter<'_, T> {
        let mut stack = vec![];
        if self.nodes[self.root].envelope().intersects(envelope) {
            stack.push(self.root);
        }

        IntersectingIter {
            tree: self,
            query: *envelope,
            stack,
            entries: None,
        }
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id] = Node::empty_leaf();
        self.free.push(id);
    }

    fn refresh_envelope(&mut self, id: NodeId) {
        let refreshed = match &self.nodes[id] {
            Node::Leaf { envelopes, .. } => envelopes.iter().copied().collect(),
            Node::Branch { children, .. } => children
                .iter()
                .map(|&child| *self.nodes[child].envelope())
                .collect(),
        };

        self.nodes[id].set_envelope(refreshed);
    }

    fn insert_entry(&mut self, envelope: Envelope, item: T) {
        if let Some(sibling) = self.insert_into(self.root, envelope, item) {
            let old_root = self.root;
            let envelope = self.nodes[old_root]
                .envelope()
                .union(self.nodes[sibling].envelope());
            self.root = self.alloc(Node::Branch {
                envelope,
                children: vec![old_root, sibling],
            });

            log::debug!("R-tree root is split, tree depth is {}", self.depth());
        }

        self.len += 1;
    }

    /// Inserts the entry into the subtree of `id`. Returns the id of the new sibling if the node was split.
    fn insert_into(&mut self, id: NodeId, envelope: Envelope, item: T) -> Option<NodeId> {
        let target = match &self.nodes[id] {
            Node::Leaf { .. } => None,
            Node::Branch { children, .. } => self.choose_child(children, &envelope),
        };

        match target {
            None => self.nodes[id].push_entry(envelope, item),
            Some((position, child)) => {
                self.nodes[id].expand(&envelope);
                if let Some(sibling) = self.insert_into(child, envelope, item) {
                    self.nodes[id].insert_child(position + 1, sibling);
                }
            }
        }

        if self.nodes[id].len() > self.params.max_entries {
            Some(self.split(id))
        } else {
            None
        }
    }

    /// Child that needs the least enlargement to include the envelope. Ties are resolved by the smaller area and
    /// then by the position.
    fn choose_child(&self, children: &[NodeId], envelope: &Envelope) -> Option<(usize, NodeId)> {
        let mut best: Option<(usize, NodeId, f64, f64)> = None;
        for (position, &child) in children.iter().enumerate() {
            let child_envelope = self.nodes[child].envelope();
            let enlargement = child_envelope.enlargement(envelope);
            let area = child_envelope.area();

            let is_better = match best {
                None => true,
                Some((_, _, best_enlargement, best_area)) => {
                    enlargement < best_enlargement
                        || (enlargement == best_enlargement && area < best_area)
                }
            };

            if is_better {
                best = Some((position, child, enlargement, area));
            }
        }

        best.map(|(position, child, _, _)| (position, child))
    }

    fn split(&mut self, id: NodeId) -> NodeId {
        let sibling = match &mut self.nodes[id] {
            Node::Leaf {
                envelopes, items, ..
            } => {
                let keep = items.len().div_ceil(2);
                Node::Leaf {
                    envelope: Envelope::EMPTY,
                    envelopes: envelopes.split_off(keep),
                    items: items.split_off(keep),
                }
            }
            Node::Branch { children, .. } => {
                let keep = children.len().div_ceil(2);
                Node::Branch {
                    envelope: Envelope::EMPTY,
                    children: children.split_off(keep),
                }
            }
        };

        let sibling = self.alloc(sibling);
        self.refresh_envelope(id);
        self.refresh_envelope(sibling);

        log::debug!(
            "R-tree node {id} is split into {} + {} entries",
            self.nodes[id].len(),
            self.nodes[sibling].len()
        );

        sibling
    }

    fn query_node<'a, F>(
        &'a self,
        id: NodeId,
        envelope: &Envelope,
        visit: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(&'a T) -> ControlFlow<()>,
    {
        match &self.nodes[id] {
            Node::Leaf {
                envelopes, items, ..
            } => {
                for (entry_envelope, item) in envelopes.iter().zip(items) {
                    if entry_envelope.intersects(envelope) {
                        visit(item)?;
                    }
                }
            }
            Node::Branch { children, .. } => {
                for &child in children {
                    if self.nodes[child].envelope().intersects(envelope) {
                        self.query_node(child, envelope, visit)?;
                    }
                }
            }
        }

        ControlFlow::Continue(())
    }
}

impl<T: PartialEq> RTree<T> {
    /// Finds the leaf holding the entry. Returns the leaf id and the position of the entry in it, and fills `path`
    /// with the ancestors of the leaf, starting from the root.
    fn find_entry(
        &self,
        id: NodeId,
        envelope: &Envelope,
        item: &T,
        path: &mut Vec<NodeId>,
    ) -> Option<(NodeId, usize)> {
        match &self.nodes[id] {
            Node::Leaf {
                envelopes, items, ..
            } => envelopes
                .iter()
                .zip(items)
                .position(|(entry_envelope, entry)| entry_envelope == envelope && entry == item)
                .map(|position| (id, position)),
            Node::Branch { children, .. } => {
                path.push(id);
                for &child in children {
                    if self.nodes[child].envelope().contains(envelope) {
                        if let Some(found) = self.find_entry(child, envelope, item, path) {
                            return Some(found);
                        }
                    }
                }

                path.pop();
                None
            }
        }
    }

    fn remove_entry(&mut self, envelope: &Envelope, item: &T) -> bool {
        let mut path = vec![];
        let Some((leaf, position)) = self.find_entry(self.root, envelope, item, &mut path) else {
            return false;
        };

        if let Node::Leaf {
            envelopes, items, ..
        } = &mut self.nodes[leaf]
        {
            envelopes.remove(position);
            items.remove(position);
        }

        self.len -= 1;
        self.condense(leaf, &path);

        true
    }

    /// Refreshes envelopes from the leaf up to the root, detaching nodes that became empty.
    fn condense(&mut self, leaf: NodeId, path: &[NodeId]) {
        let mut node = leaf;
        for &parent in path.iter().rev() {
            self.refresh_envelope(node);
            if self.nodes[node].len() == 0 {
                self.nodes[parent].remove_child(node);
                self.release(node);
            }

            node = parent;
        }

        self.refresh_envelope(self.root);
        self.collapse_root();
    }

    fn collapse_root(&mut self) {
        loop {
            let root = self.root;
            match &self.nodes[root] {
                Node::Branch { children, .. } if children.len() == 1 => {
                    self.root = children[0];
                    self.release(root);
                    log::debug!("R-tree root is collapsed, tree depth is {}", self.depth());
                }
                Node::Branch { children, .. } if children.is_empty() => {
                    self.nodes[root] = Node::empty_leaf();
                    return;
                }
                _ => return,
            }
        }
    }
}

impl<T> SpatialIndex<T> for RTree<T> {
    fn insert(&mut self, envelope: Envelope, item: T) -> Result<(), MeridianError> {
        validate_envelope(&envelope)?;
        self.insert_entry(envelope, item);
        Ok(())
    }

    fn remove(&mut self, envelope: &Envelope, item: &T) -> bool
    where
        T: PartialEq,
    {
        if !envelope.is_valid() {
            return false;
        }

        self.remove_entry(envelope, item)
    }

    fn query<'a, F>(&'a self, envelope: &Envelope, mut visit: F) -> ControlFlow<()>
    where
        T: 'a,
        F: FnMut(&'a T) -> ControlFlow<()>,
    {
        if !self.nodes[self.root].envelope().intersects(envelope) {
            return ControlFlow::Continue(());
        }

        self.query_node(self.root, envelope, &mut visit)
    }
}

/// Iterator returned by [`RTree::iter_intersecting`].
pub struct IntersectingIter<'a, T> {
    tree: &'a RTree<T>,
    query: Envelope,
    stack: Vec<NodeId>,
    entries: Option<Zip<Iter<'a, Envelope>, Iter<'a, T>>>,
}

impl<'a, T> Iterator for IntersectingIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            if let Some(entries) = &mut self.entries {
                for (envelope, item) in entries.by_ref() {
                    if envelope.intersects(&self.query) {
                        return Some(item);
                    }
                }

                self.entries = None;
            }

            let id = self.stack.pop()?;
            match &tree.nodes[id] {
                Node::Leaf {
                    envelopes, items, ..
                } => self.entries = Some(envelopes.iter().zip(items.iter())),
                Node::Branch { children, .. } => {
                    for &child in children.iter().rev() {
                        if tree.nodes[child].envelope().intersects(&self.query) {
                            self.stack.push(child);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_utils::{brute_force, pseudo_random_envelopes, sorted};
    use assert_matches::assert_matches;

    /// Checks that every node envelope is the union of its entries and returns the union of leaf entries.
    fn check_envelopes<T>(tree: &RTree<T>, id: NodeId) -> Envelope {
        let expected: Envelope = match &tree.nodes[id] {
            Node::Leaf { envelopes, .. } => envelopes.iter().copied().collect(),
            Node::Branch { children, .. } => {
                assert!(!children.is_empty());
                children
                    .iter()
                    .map(|&child| check_envelopes(tree, child))
                    .collect()
            }
        };

        assert_eq!(*tree.nodes[id].envelope(), expected);
        expected
    }

    #[test]
    fn insert_and_query() {
        let envelopes = pseudo_random_envelopes(500, 20.0);
        let mut tree = RTree::new(RTreeParams::default().with_max_entries(4)).unwrap();
        for (index, envelope) in envelopes.iter().enumerate() {
            tree.insert(*envelope, index).unwrap();
        }

        assert_eq!(tree.len(), 500);
        assert!(tree.depth() > 2);
        assert_eq!(check_envelopes(&tree, tree.root), tree.envelope());
        assert_eq!(tree.envelope(), envelopes.iter().copied().collect());

        for query in [
            Envelope::new(0.0, 0.0, 100.0, 100.0),
            Envelope::new(250.0, 400.0, 600.0, 450.0),
            Envelope::new(999.0, 999.0, 2000.0, 2000.0),
            Envelope::new(-10.0, -10.0, -1.0, -1.0),
        ] {
            assert_eq!(
                sorted(tree.query_collect(&query)),
                brute_force(&envelopes, &query)
            );
        }
    }

    #[test]
    fn root_split() {
        let mut tree = RTree::new(RTreeParams::default().with_max_entries(2)).unwrap();
        tree.insert(Envelope::new(0.0, 0.0, 1.0, 1.0), 0).unwrap();
        tree.insert(Envelope::new(10.0, 0.0, 11.0, 1.0), 1).unwrap();
        assert_eq!(tree.depth(), 1);

        tree.insert(Envelope::new(20.0, 0.0, 21.0, 1.0), 2).unwrap();
        assert_eq!(tree.depth(), 2);

        let Node::Branch { children, .. } = &tree.nodes[tree.root] else {
            panic!("root must be a branch");
        };
        assert_eq!(children.len(), 2);
        assert_matches!(&tree.nodes[children[0]], Node::Leaf { items, .. } if items == &vec![0, 1]);
        assert_matches!(&tree.nodes[children[1]], Node::Leaf { items, .. } if items == &vec![2]);
        assert_eq!(tree.envelope(), Envelope::new(0.0, 0.0, 21.0, 1.0));
    }

    #[test]
    fn split_sibling_is_placed_next_to_the_node() {
        let mut tree = RTree::new(RTreeParams::default().with_max_entries(3)).unwrap();
        for (index, x) in [0.0, 10.0, 100.0, 200.0, 1.0, 2.0].into_iter().enumerate() {
            tree.insert(Envelope::new(x, 0.0, x + 0.5, 0.5), index).unwrap();
        }

        let Node::Branch { children, .. } = &tree.nodes[tree.root] else {
            panic!("root must be a branch");
        };
        let leaves: Vec<Vec<usize>> = children
            .iter()
            .map(|&child| match &tree.nodes[child] {
                Node::Leaf { items, .. } => items.clone(),
                Node::Branch { .. } => panic!("expected a leaf"),
            })
            .collect();

        assert_eq!(leaves, vec![vec![0, 1], vec![4, 5], vec![2, 3]]);
        check_envelopes(&tree, tree.root);
    }

    #[test]
    fn remove() {
        let envelopes = pseudo_random_envelopes(300, 20.0);
        let mut tree = RTree::new(RTreeParams::default().with_max_entries(5)).unwrap();
        for (index, envelope) in envelopes.iter().enumerate() {
            tree.insert(*envelope, index).unwrap();
        }

        for index in (0..300).step_by(2) {
            assert!(tree.remove(&envelopes[index], &index));
            assert!(!tree.remove(&envelopes[index], &index));
        }

        assert_eq!(tree.len(), 150);
        check_envelopes(&tree, tree.root);

        let everything = Envelope::new(-1.0, -1.0, 2000.0, 2000.0);
        let expected: Vec<usize> = (1..300).step_by(2).collect();
        assert_eq!(sorted(tree.query_collect(&everything)), expected);

        let remaining: Envelope = expected.iter().map(|&index| envelopes[index]).collect();
        assert_eq!(tree.envelope(), remaining);
    }

    #[test]
    fn remove_all_and_reuse() {
        let envelopes = pseudo_random_envelopes(100, 20.0);
        let mut tree = RTree::new(RTreeParams::default().with_max_entries(3)).unwrap();
        for (index, envelope) in envelopes.iter().enumerate() {
            tree.insert(*envelope, index).unwrap();
        }

        let arena_size = tree.nodes.len();
        for (index, envelope) in envelopes.iter().enumerate().rev() {
            assert!(tree.remove(envelope, &index));
            check_envelopes(&tree, tree.root);
        }

        assert!(tree.is_empty());
        assert!(tree.envelope().is_empty());
        assert_eq!(tree.depth(), 1);

        for (index, envelope) in envelopes.iter().enumerate() {
            tree.insert(*envelope, index).unwrap();
        }
        assert_eq!(tree.len(), 100);
        assert_eq!(tree.nodes.len(), arena_size);
        check_envelopes(&tree, tree.root);
    }

    #[test]
    fn remove_requires_exact_pair() {
        let mut tree = RTree::default();
        let envelope = Envelope::new(0.0, 0.0, 1.0, 1.0);
        tree.insert(envelope, "a").unwrap();
        tree.insert(envelope, "b").unwrap();

        assert!(!tree.remove(&envelope, &"c"));
        assert!(!tree.remove(&Envelope::new(0.0, 0.0, 1.0, 2.0), &"a"));
        assert!(tree.remove(&envelope, &"a"));
        assert_eq!(tree.query_collect(&envelope), vec![&"b"]);
    }

    #[test]
    fn query_stops_on_break() {
        let envelopes = pseudo_random_envelopes(200, 20.0);
        let mut tree = RTree::default();
        for (index, envelope) in envelopes.iter().enumerate() {
            tree.insert(*envelope, index).unwrap();
        }

        let mut visited = 0;
        let result = tree.query(&tree.envelope(), |_| {
            visited += 1;
            if visited == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(result, ControlFlow::Break(()));
        assert_eq!(visited, 3);
    }

    #[test]
    fn iter_intersecting_matches_query() {
        let envelopes = pseudo_random_envelopes(400, 20.0);
        let mut tree = RTree::new(RTreeParams::default().with_max_entries(6)).unwrap();
        for (index, envelope) in envelopes.iter().enumerate() {
            tree.insert(*envelope, index).unwrap();
        }

        let query = Envelope::new(100.0, 100.0, 500.0, 300.0);
        let lazy: Vec<&usize> = tree.iter_intersecting(&query).collect();
        assert_eq!(lazy, tree.query_collect(&query));
        assert_eq!(tree.iter().count(), 400);
        assert_eq!(tree.iter_intersecting(&Envelope::EMPTY).count(), 0);
    }

    #[test]
    fn invalid_envelopes_are_rejected() {
        let mut tree = RTree::default();
        assert_eq!(
            tree.insert(Envelope::EMPTY, 1),
            Err(MeridianError::InvalidEnvelope)
        );
        assert_eq!(
            tree.insert(Envelope::new(0.0, 0.0, f64::INFINITY, 1.0), 1),
            Err(MeridianError::InvalidEnvelope)
        );
        assert!(tree.is_empty());
        assert!(!tree.remove(&Envelope::EMPTY, &1));
    }

    #[test]
    fn invalid_capacity() {
        assert_matches!(
            RTree::<u32>::new(RTreeParams { max_entries: 1 }),
            Err(MeridianError::InvalidCapacity)
        );
    }

    #[test]
    fn params_deserialization() {
        let params: RTreeParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, RTreeParams::default());

        let params: RTreeParams = serde_json::from_str(r#"{"max_entries": 4}"#).unwrap();
        assert_eq!(params.max_entries, 4);
    }
}
