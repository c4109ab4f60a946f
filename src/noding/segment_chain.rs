//! A chain of line segments that records the nodes found on it and can be
//! split into fully noded substrings.
//!
//! A node is a coordinate plus the index of the segment it lies on. Nodes
//! that land exactly on the next vertex are moved onto that vertex's index,
//! so every node location has one canonical `(segment_index, coord)` key.

use std::cmp::Ordering;

use ahash::AHashSet;
use geo::Coord;

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentNode {
    pub coord:         Coord<f64>,
    pub segment_index: usize,
    /// `false` if the node coincides with the vertex at `segment_index`.
    is_interior:       bool,
}

impl SegmentNode {
    fn new(coord: Coord<f64>, segment_index: usize, pts: &[Coord<f64>]) -> Self {
        Self { coord, segment_index, is_interior: coord != pts[segment_index] }
    }

    #[inline] pub fn is_interior(&self) -> bool { self.is_interior }

    /// Squared-length-scaled position along the node's segment.
    fn position(&self, pts: &[Coord<f64>]) -> f64 {
        if !self.is_interior { return 0.0 }
        let p0 = pts[self.segment_index];
        let dir = match pts.get(self.segment_index + 1) {
            Some(p1) => Coord { x: p1.x - p0.x, y: p1.y - p0.y },
            None => Coord { x: self.coord.x - p0.x, y: self.coord.y - p0.y },
        };
        (self.coord.x - p0.x) * dir.x + (self.coord.y - p0.y) * dir.y
    }

    fn compare(&self, other: &Self, pts: &[Coord<f64>]) -> Ordering {
        self.segment_index.cmp(&other.segment_index)
            .then_with(|| self.position(pts).total_cmp(&other.position(pts)))
            .then_with(|| self.coord.x.total_cmp(&other.coord.x))
            .then_with(|| self.coord.y.total_cmp(&other.coord.y))
    }
}

type NodeKey = (usize, u64, u64);

#[inline]
fn node_key(segment_index: usize, coord: Coord<f64>) -> NodeKey {
    // Normalise -0.0 so that it keys the same as 0.0.
    (segment_index, (coord.x + 0.0).to_bits(), (coord.y + 0.0).to_bits())
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// An ordered run of coordinates carrying an opaque `context` and the nodes
/// added to it during noding.
#[derive(Clone, Debug)]
pub struct SegmentChain<C> {
    pts:     Vec<Coord<f64>>,
    context: C,
    nodes:   Vec<SegmentNode>,
    keys:    AHashSet<NodeKey>,
}

impl<C> SegmentChain<C> {
    pub fn new(pts: Vec<Coord<f64>>, context: C) -> Self {
        Self { pts, context, nodes: Vec::new(), keys: AHashSet::new() }
    }

    #[inline] pub fn coordinates(&self) -> &[Coord<f64>] { &self.pts }
    #[inline] pub fn coordinate(&self, i: usize) -> Coord<f64> { self.pts[i] }
    #[inline] pub fn len(&self)      -> usize { self.pts.len() }
    #[inline] pub fn is_empty(&self) -> bool  { self.pts.is_empty() }
    #[inline] pub fn context(&self)  -> &C { &self.context }
    #[inline] pub fn into_context(self) -> C { self.context }

    /// Number of segments (one less than the number of vertices).
    #[inline] pub fn num_segments(&self) -> usize { self.pts.len().saturating_sub(1) }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.pts.len() > 1 && self.pts.first() == self.pts.last()
    }

    /// Nodes in the order they were added.
    #[inline] pub fn nodes(&self) -> &[SegmentNode] { &self.nodes }

    /// Record a node at `coord` on segment `segment_index`. Adding the same
    /// node twice has no effect.
    pub fn add_intersection(&mut self, coord: Coord<f64>, segment_index: usize) {
        debug_assert!(segment_index < self.pts.len(), "segment index {segment_index} out of range");
        let segment_index = match self.pts.get(segment_index + 1) {
            Some(&next) if next == coord => segment_index + 1,
            _ => segment_index,
        };
        if !self.keys.insert(node_key(segment_index, coord)) { return }
        self.nodes.push(SegmentNode::new(coord, segment_index, &self.pts));
    }

    // -----------------------------------------------------------------------
    // Splitting
    // -----------------------------------------------------------------------

    /// Nodes sorted along the chain, including both endpoints and the apex
    /// of any collapsed `A-B-A` spike.
    fn split_nodes(&self) -> Vec<SegmentNode> {
        let pts = &self.pts;
        let mut nodes = self.nodes.clone();
        let Some(last) = pts.len().checked_sub(1) else { return nodes };

        nodes.push(SegmentNode::new(pts[0], 0, pts));
        nodes.push(SegmentNode::new(pts[last], last, pts));

        // Vertex collapses: A-B-A.
        for i in 0..pts.len().saturating_sub(2) {
            if pts[i] == pts[i + 2] { nodes.push(SegmentNode::new(pts[i + 1], i + 1, pts)) }
        }
        self.sort_nodes(&mut nodes);

        // Collapses between nodes: two equal nodes with one vertex between them.
        let collapsed = nodes.windows(2)
            .filter(|w| w[0].coord == w[1].coord)
            .filter_map(|w| {
                let mut between = w[1].segment_index - w[0].segment_index;
                if !w[1].is_interior { between = between.saturating_sub(1) }
                (between == 1).then(|| w[0].segment_index + 1)
            })
            .collect::<Vec<_>>();
        if !collapsed.is_empty() {
            nodes.extend(collapsed.into_iter().map(|i| SegmentNode::new(pts[i], i, pts)));
            self.sort_nodes(&mut nodes);
        }
        nodes
    }

    fn sort_nodes(&self, nodes: &mut Vec<SegmentNode>) {
        nodes.sort_by(|a, b| a.compare(b, &self.pts));
        nodes.dedup_by(|b, a| a.segment_index == b.segment_index && a.coord == b.coord);
    }

    /// Coordinates of the chain between two consecutive nodes.
    fn split_coordinates(&self, from: &SegmentNode, to: &SegmentNode) -> Vec<Coord<f64>> {
        let mut pts = vec![from.coord];
        if to.segment_index > from.segment_index {
            pts.extend_from_slice(&self.pts[from.segment_index + 1..=to.segment_index]);
        }
        if to.is_interior || to.segment_index == from.segment_index {
            pts.push(to.coord);
        }
        pts.dedup();
        pts
    }

    /// The original vertices with every node spliced in, without repeats.
    pub fn noded_coordinates(&self) -> Vec<Coord<f64>> {
        let nodes = self.split_nodes();
        let mut out = Vec::with_capacity(self.pts.len() + self.nodes.len());
        if let Some(first) = nodes.first() { out.push(first.coord) }

        for w in nodes.windows(2) {
            out.extend(self.split_coordinates(&w[0], &w[1]).into_iter().skip(1));
        }
        out.dedup();
        out
    }
}

impl<C: Clone> SegmentChain<C> {
    /// Split the chain at every node. Pieces with fewer than two distinct
    /// points are dropped.
    pub fn noded_substrings(&self) -> Vec<SegmentChain<C>> {
        self.split_nodes().windows(2)
            .map(|w| self.split_coordinates(&w[0], &w[1]))
            .filter(|pts| pts.len() > 1)
            .map(|pts| SegmentChain::new(pts, self.context.clone()))
            .collect()
    }
}

/// Split every chain at its nodes, keeping chain order.
pub fn noded_substrings<C: Clone>(chains: impl IntoIterator<Item = SegmentChain<C>>) -> Vec<SegmentChain<C>> {
    chains.into_iter().flat_map(|chain| chain.noded_substrings()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn chain(pts: &[(f64, f64)]) -> SegmentChain<&'static str> {
        SegmentChain::new(pts.iter().map(|&(x, y)| coord! { x: x, y: y }).collect(), "ctx")
    }

    fn xy(chain: &SegmentChain<&'static str>) -> Vec<(f64, f64)> {
        chain.coordinates().iter().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn node_on_next_vertex_is_normalised() {
        let mut ss = chain(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]);
        ss.add_intersection(coord! { x: 2.0, y: 0.0 }, 0);
        ss.add_intersection(coord! { x: 2.0, y: 0.0 }, 1);

        assert_eq!(ss.nodes().len(), 1);
        assert_eq!(ss.nodes()[0].segment_index, 1);
        assert!(!ss.nodes()[0].is_interior());
    }

    #[test]
    fn noded_coordinates_are_ordered_along_segments() {
        let mut ss = chain(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        ss.add_intersection(coord! { x: 7.0, y: 0.0 }, 0);
        ss.add_intersection(coord! { x: 3.0, y: 0.0 }, 0);
        ss.add_intersection(coord! { x: 10.0, y: 4.0 }, 1);
        ss.add_intersection(coord! { x: 3.0, y: 0.0 }, 0);

        let pts = ss.noded_coordinates().into_iter().map(|c| (c.x, c.y)).collect::<Vec<_>>();
        assert_eq!(pts, vec![(0.0, 0.0), (3.0, 0.0), (7.0, 0.0), (10.0, 0.0), (10.0, 4.0), (10.0, 10.0)]);
    }

    #[test]
    fn noded_coordinates_ordered_for_backward_segment() {
        let mut ss = chain(&[(10.0, 5.0), (0.0, 5.0)]);
        ss.add_intersection(coord! { x: 2.0, y: 5.0 }, 0);
        ss.add_intersection(coord! { x: 8.0, y: 5.0 }, 0);

        let pts = ss.noded_coordinates().into_iter().map(|c| c.x).collect::<Vec<_>>();
        assert_eq!(pts, vec![10.0, 8.0, 2.0, 0.0]);
    }

    #[test]
    fn substrings_split_at_nodes() {
        let mut ss = chain(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
        ss.add_intersection(coord! { x: 2.0, y: 0.0 }, 0);
        ss.add_intersection(coord! { x: 4.0, y: 0.0 }, 0);

        let parts = ss.noded_substrings();
        assert_eq!(parts.len(), 3);
        assert_eq!(xy(&parts[0]), vec![(0.0, 0.0), (2.0, 0.0)]);
        assert_eq!(xy(&parts[1]), vec![(2.0, 0.0), (4.0, 0.0)]);
        assert_eq!(xy(&parts[2]), vec![(4.0, 0.0), (4.0, 4.0)]);
        assert!(parts.iter().all(|p| *p.context() == "ctx"));
    }

    #[test]
    fn unnoded_chain_is_returned_whole() {
        let ss = chain(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let parts = ss.noded_substrings();
        assert_eq!(parts.len(), 1);
        assert_eq!(xy(&parts[0]), xy(&ss));
    }

    #[test]
    fn spikes_are_split_at_apex() {
        let ss = chain(&[(0.0, 0.0), (2.0, 0.0), (0.0, 0.0), (0.0, 3.0)]);
        let parts = ss.noded_substrings();
        assert_eq!(parts.len(), 2);
        assert_eq!(xy(&parts[0]), vec![(0.0, 0.0), (2.0, 0.0)]);
        assert_eq!(xy(&parts[1]), vec![(2.0, 0.0), (0.0, 0.0), (0.0, 3.0)]);
    }

    #[test]
    fn closed_ring() {
        let mut ss = chain(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 0.0)]);
        assert!(ss.is_closed());
        ss.add_intersection(coord! { x: 2.0, y: 1.0 }, 1);
        let parts = ss.noded_substrings();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].coordinates().last(), Some(&coord! { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn free_function_preserves_chain_order() {
        let mut a = chain(&[(0.0, 0.0), (2.0, 0.0)]);
        a.add_intersection(coord! { x: 1.0, y: 0.0 }, 0);
        let b = chain(&[(5.0, 5.0), (6.0, 6.0)]);

        let parts = noded_substrings([a, b]);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].coordinate(0), coord! { x: 5.0, y: 5.0 });
    }
}
