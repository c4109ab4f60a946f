use geo::{Coord, Rect};
use rstar::{AABB, RTreeObject};

use crate::geom::envelope;

use super::intersector::{SegmentIntersector, SegmentRef};

/// Which quadrant the direction `p0 -> p1` points into; `None` for a
/// zero-length segment.
fn quadrant(p0: Coord<f64>, p1: Coord<f64>) -> Option<u8> {
    if p0 == p1 { return None }
    let (dx, dy) = (p1.x - p0.x, p1.y - p0.y);
    Some(match (dx >= 0.0, dy >= 0.0) {
        (true, true)   => 0,
        (false, true)  => 1,
        (false, false) => 2,
        (true, false)  => 3,
    })
}

/// A run of segments `pts[start..=end]` of one chain whose directions all
/// fall in the same quadrant, so the run is monotone in both x and y and
/// its envelope is spanned by its two end vertices.
#[derive(Clone, Debug)]
pub struct MonotoneChain {
    id:    usize,
    chain: usize,
    start: usize,
    end:   usize,
    env:   Rect<f64>,
}

impl MonotoneChain {
    #[inline] pub fn id(&self)    -> usize { self.id }
    #[inline] pub fn chain(&self) -> usize { self.chain }
    #[inline] pub fn start(&self) -> usize { self.start }
    #[inline] pub fn end(&self)   -> usize { self.end }
    #[inline] pub fn envelope(&self) -> &Rect<f64> { &self.env }

    /// Call `intersector` for every pair of segments, one from each chain,
    /// whose envelopes come within `tolerance` of each other.
    pub fn compute_overlaps<I: SegmentIntersector + ?Sized>(
        &self,
        pts:       &[Coord<f64>],
        other:     &MonotoneChain,
        other_pts: &[Coord<f64>],
        tolerance: f64,
        intersector: &mut I,
    ) {
        let mut overlaps = Overlaps { a: self, a_pts: pts, b: other, b_pts: other_pts, tolerance, intersector };
        overlaps.recurse(self.start, self.end, other.start, other.end);
    }
}

impl RTreeObject for MonotoneChain {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope { envelope::to_aabb(&self.env) }
}

struct Overlaps<'a, I: ?Sized> {
    a:           &'a MonotoneChain,
    a_pts:       &'a [Coord<f64>],
    b:           &'a MonotoneChain,
    b_pts:       &'a [Coord<f64>],
    tolerance:   f64,
    intersector: &'a mut I,
}

impl<I: SegmentIntersector + ?Sized> Overlaps<'_, I> {
    fn recurse(&mut self, start0: usize, end0: usize, start1: usize, end1: usize) {
        if self.intersector.is_done() { return }

        if end0 - start0 == 1 && end1 - start1 == 1 {
            self.intersector.process_intersections(
                SegmentRef { chain: self.a.chain, index: start0, pts: self.a_pts },
                SegmentRef { chain: self.b.chain, index: start1, pts: self.b_pts },
            );
            return;
        }

        let env0 = envelope::expand_by(envelope::segment_envelope(self.a_pts[start0], self.a_pts[end0]), self.tolerance);
        let env1 = envelope::segment_envelope(self.b_pts[start1], self.b_pts[end1]);
        if !envelope::intersects(&env0, &env1) { return }

        // Bisect both runs.
        let mid0 = (start0 + end0) / 2;
        let mid1 = (start1 + end1) / 2;
        if start0 < mid0 {
            if start1 < mid1 { self.recurse(start0, mid0, start1, mid1) }
            if mid1 < end1   { self.recurse(start0, mid0, mid1, end1) }
        }
        if mid0 < end0 {
            if start1 < mid1 { self.recurse(mid0, end0, start1, mid1) }
            if mid1 < end1   { self.recurse(mid0, end0, mid1, end1) }
        }
    }
}

/// Index of the last vertex of the monotone run beginning at `start`.
fn chain_end(pts: &[Coord<f64>], start: usize) -> usize {
    let last = pts.len() - 1;

    // Zero-length segments cannot fix a quadrant; skip past them.
    let mut safe = start;
    while safe < last && pts[safe] == pts[safe + 1] { safe += 1 }
    if safe >= last { return last }

    let chain_quad = quadrant(pts[safe], pts[safe + 1]);
    let mut end = start + 1;
    while end < pts.len() {
        // Zero-length segments stay in the current run.
        if let Some(quad) = quadrant(pts[end - 1], pts[end]) {
            if Some(quad) != chain_quad { break }
        }
        end += 1;
    }
    end - 1
}

/// Split `pts` into monotone chains for chain `chain`, numbering them from
/// `first_id`.
pub fn monotone_chains(pts: &[Coord<f64>], chain: usize, first_id: usize) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    if pts.len() < 2 { return chains }

    let mut start = 0;
    while start < pts.len() - 1 {
        let end = chain_end(pts, start);
        chains.push(MonotoneChain {
            id: first_id + chains.len(),
            chain,
            start,
            end,
            env: envelope::segment_envelope(pts[start], pts[end]),
        });
        start = end;
    }
    chains
}
