//! Callbacks invoked on candidate segment pairs by the intersection finder.

use geo::Coord;

use crate::geom::PrecisionModel;
use crate::geom::distance::{distance, point_segment_distance};

use super::line_intersection::intersect;

/// One segment of a chain, as seen by a [`SegmentIntersector`].
#[derive(Clone, Copy, Debug)]
pub struct SegmentRef<'a> {
    /// Index of the chain in the input slice.
    pub chain: usize,
    /// Index of the segment's first vertex.
    pub index: usize,
    /// All coordinates of the chain.
    pub pts:   &'a [Coord<f64>],
}

impl SegmentRef<'_> {
    #[inline] pub fn p0(&self) -> Coord<f64> { self.pts[self.index] }
    #[inline] pub fn p1(&self) -> Coord<f64> { self.pts[self.index + 1] }

    #[inline] pub fn is_same_segment(&self, other: &SegmentRef<'_>) -> bool {
        self.chain == other.chain && self.index == other.index
    }

    /// `true` if vertex `self.index + offset` is the first or last vertex of the chain.
    #[inline]
    fn is_chain_end(&self, offset: usize) -> bool {
        let i = self.index + offset;
        i == 0 || i + 1 == self.pts.len()
    }
}

/// Processes pairs of segments whose envelopes overlap.
pub trait SegmentIntersector {
    fn process_intersections(&mut self, a: SegmentRef<'_>, b: SegmentRef<'_>);

    /// Stop the search early once this returns `true`.
    fn is_done(&self) -> bool { false }
}

/// A node to be spliced into a chain once the search completes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Insertion {
    pub chain:         usize,
    pub segment_index: usize,
    pub coord:         Coord<f64>,
}

// ---------------------------------------------------------------------------
// Snap-rounding intersection adder
// ---------------------------------------------------------------------------

/// Finds interior intersections between the unrounded input chains.
///
/// Besides true intersections, a vertex lying within `nearness_tol` of
/// another segment's interior is reported as an intersection on that
/// segment. Without this, near-parallel vertex/segment pairs can round to
/// crossing segments that were never noded.
#[derive(Clone, Debug)]
pub struct SnapRoundingIntersectionAdder {
    nearness_tol:  f64,
    intersections: Vec<Coord<f64>>,
    insertions:    Vec<Insertion>,
}

impl SnapRoundingIntersectionAdder {
    /// Near-vertex tolerance as a fraction of the grid size.
    pub const NEARNESS_FACTOR: f64 = 100.0;

    pub fn new(pm: &PrecisionModel) -> Self {
        Self {
            nearness_tol:  pm.grid_size() / Self::NEARNESS_FACTOR,
            intersections: Vec::new(),
            insertions:    Vec::new(),
        }
    }

    #[inline] pub fn tolerance(&self) -> f64 { self.nearness_tol }
    #[inline] pub fn intersections(&self) -> &[Coord<f64>] { &self.intersections }
    #[inline] pub fn insertions(&self) -> &[Insertion] { &self.insertions }

    /// Consume the adder, returning the intersection points and the nodes to
    /// add to each chain.
    pub fn into_parts(self) -> (Vec<Coord<f64>>, Vec<Insertion>) { (self.intersections, self.insertions) }

    fn insert(&mut self, seg: &SegmentRef<'_>, coord: Coord<f64>) {
        self.insertions.push(Insertion { chain: seg.chain, segment_index: seg.index, coord });
    }

    fn process_near_vertex(&mut self, p: Coord<f64>, seg: &SegmentRef<'_>) {
        let (p0, p1) = (seg.p0(), seg.p1());
        if distance(p, p0) < self.nearness_tol || distance(p, p1) < self.nearness_tol { return }
        if point_segment_distance(p, p0, p1) < self.nearness_tol {
            self.intersections.push(p);
            self.insert(seg, p);
        }
    }
}

impl SegmentIntersector for SnapRoundingIntersectionAdder {
    fn process_intersections(&mut self, a: SegmentRef<'_>, b: SegmentRef<'_>) {
        if a.is_same_segment(&b) { return }

        let (p00, p01, p10, p11) = (a.p0(), a.p1(), b.p0(), b.p1());
        if let Some(int) = intersect(p00, p01, p10, p11) {
            if int.is_interior(p00, p01, p10, p11) {
                for &pt in &int.points {
                    self.intersections.push(pt);
                    self.insert(&a, pt);
                    self.insert(&b, pt);
                }
                return;
            }
        }

        self.process_near_vertex(p00, &b);
        self.process_near_vertex(p01, &b);
        self.process_near_vertex(p10, &a);
        self.process_near_vertex(p11, &a);
    }
}

// ---------------------------------------------------------------------------
// Interior intersection finder
// ---------------------------------------------------------------------------

/// The first place two segments meet other than at a shared chain endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteriorIntersection {
    pub location: Coord<f64>,
    pub segments: [[Coord<f64>; 2]; 2],
}

/// Stops at the first interior intersection, or at the first vertex shared
/// by two segments where the vertex is not an endpoint of both chains.
/// Adjacent segments of one chain are allowed to share their common vertex.
#[derive(Clone, Debug, Default)]
pub struct InteriorIntersectionFinder {
    found: Option<InteriorIntersection>,
}

impl InteriorIntersectionFinder {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn intersection(&self) -> Option<&InteriorIntersection> { self.found.as_ref() }

    /// A vertex coincidence is only legal between two chain endpoints.
    fn interior_vertex_hit(a: &SegmentRef<'_>, b: &SegmentRef<'_>) -> Option<Coord<f64>> {
        for i in 0..2 {
            for j in 0..2 {
                let (pa, pb) = (a.pts[a.index + i], b.pts[b.index + j]);
                if pa == pb && !(a.is_chain_end(i) && b.is_chain_end(j)) { return Some(pa) }
            }
        }
        None
    }
}

impl SegmentIntersector for InteriorIntersectionFinder {
    fn process_intersections(&mut self, a: SegmentRef<'_>, b: SegmentRef<'_>) {
        if self.found.is_some() || a.is_same_segment(&b) { return }

        let (p00, p01, p10, p11) = (a.p0(), a.p1(), b.p0(), b.p1());
        let Some(int) = intersect(p00, p01, p10, p11) else { return };

        let location = if int.is_interior(p00, p01, p10, p11) {
            int.points.first().copied()
        } else if a.chain == b.chain && a.index.abs_diff(b.index) <= 1 {
            None
        } else {
            Self::interior_vertex_hit(&a, &b)
        };

        if let Some(location) = location {
            self.found = Some(InteriorIntersection { location, segments: [[p00, p01], [p10, p11]] });
        }
    }

    fn is_done(&self) -> bool { self.found.is_some() }
}
