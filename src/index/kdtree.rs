//! A 2-D k-d tree keyed by exact coordinates.
//!
//! # Structure
//!
//! Nodes live in a flat `Vec` and refer to their children by [`KdNodeId`].
//! Even levels split on `x`, odd levels on `y`; a point goes left when its
//! split ordinate is strictly less than the node's, right otherwise.
//!
//! Each distinct coordinate is stored once. Re-inserting a coordinate that
//! is already present bumps that node's `count` and leaves its payload alone.
//!
//! The tree is not self-balancing, so callers that insert points in sorted
//! order should shuffle them first (see
//! [`HotPixelIndex::add_many`](crate::HotPixelIndex::add_many)).

use std::fmt;

use geo::{Coord, Rect};

use crate::geom::envelope;

// ---------------------------------------------------------------------------
// Index type
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KdNodeId(pub usize);

impl fmt::Display for KdNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KdNodeId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct KdNode<T> {
    pub coord: Coord<f64>,
    pub data:  T,
    /// Number of times this coordinate has been inserted.
    pub count: usize,
    left:      Option<KdNodeId>,
    right:     Option<KdNodeId>,
}

impl<T> KdNode<T> {
    #[inline] pub fn is_repeated(&self) -> bool { self.count > 1 }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct KdTree<T> {
    nodes: Vec<KdNode<T>>,
    root:  Option<KdNodeId>,
}

impl<T> Default for KdTree<T> {
    fn default() -> Self { Self::new() }
}

impl<T> KdTree<T> {
    pub fn new() -> Self { Self { nodes: Vec::new(), root: None } }

    pub fn len(&self)      -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool  { self.nodes.is_empty() }

    pub fn node(&self, id: KdNodeId)         -> &KdNode<T>     { &self.nodes[id.0] }
    pub fn node_mut(&mut self, id: KdNodeId) -> &mut KdNode<T> { &mut self.nodes[id.0] }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &KdNode<T>> + '_ { self.nodes.iter() }

    /// Split on `x` at even depth, `y` at odd depth.
    #[inline]
    fn goes_left(p: Coord<f64>, split: Coord<f64>, odd: bool) -> bool {
        if odd { p.y < split.y } else { p.x < split.x }
    }

    // -----------------------------------------------------------------------
    // Insertion and lookup
    // -----------------------------------------------------------------------

    /// Insert `data` at `p`, or return the existing node at `p` (dropping
    /// `data` and incrementing the node's count).
    pub fn insert(&mut self, p: Coord<f64>, data: T) -> KdNodeId {
        let Some(mut current) = self.root else {
            let id = self.push(p, data);
            self.root = Some(id);
            return id;
        };

        let mut odd = false;
        loop {
            let node = &mut self.nodes[current.0];
            if node.coord == p {
                node.count += 1;
                return current;
            }

            let left = Self::goes_left(p, node.coord, odd);
            let child = if left { node.left } else { node.right };
            match child {
                Some(next) => current = next,
                None => {
                    let id = self.push(p, data);
                    let parent = &mut self.nodes[current.0];
                    if left { parent.left = Some(id) } else { parent.right = Some(id) }
                    return id;
                }
            }
            odd = !odd;
        }
    }

    fn push(&mut self, coord: Coord<f64>, data: T) -> KdNodeId {
        let id = KdNodeId(self.nodes.len());
        self.nodes.push(KdNode { coord, data, count: 1, left: None, right: None });
        id
    }

    /// The node stored at exactly `p`, if any.
    pub fn find(&self, p: Coord<f64>) -> Option<KdNodeId> {
        let mut current = self.root;
        let mut odd = false;
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if node.coord == p { return Some(id) }
            current = if Self::goes_left(p, node.coord, odd) { node.left } else { node.right };
            odd = !odd;
        }
        None
    }

    // -----------------------------------------------------------------------
    // Range queries
    // -----------------------------------------------------------------------

    /// Call `visit` for every node whose coordinate lies in the closed
    /// envelope `env`.
    pub fn query(&self, env: &Rect<f64>, mut visit: impl FnMut(KdNodeId)) {
        let (min, max) = (env.min(), env.max());
        let mut stack = Vec::new();
        if let Some(root) = self.root { stack.push((root, false)) }

        while let Some((id, odd)) = stack.pop() {
            let node = &self.nodes[id.0];
            let (lo, hi, split) = if odd { (min.y, max.y, node.coord.y) } else { (min.x, max.x, node.coord.x) };

            if envelope::covers(env, node.coord) { visit(id) }
            if let Some(left) = node.left.filter(|_| lo < split) { stack.push((left, !odd)) }
            if let Some(right) = node.right.filter(|_| split <= hi) { stack.push((right, !odd)) }
        }
    }

    /// Ids of all nodes inside `env`.
    pub fn query_ids(&self, env: &Rect<f64>) -> Vec<KdNodeId> {
        let mut ids = Vec::new();
        self.query(env, |id| ids.push(id));
        ids
    }

    /// Height of the tree (0 when empty).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = Vec::new();
        if let Some(root) = self.root { stack.push((root, 1)) }

        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[id.0];
            stack.extend(node.left.map(|c| (c, depth + 1)));
            stack.extend(node.right.map(|c| (c, depth + 1)));
        }
        deepest
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
