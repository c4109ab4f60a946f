use log::trace;
use rstar::RTree;

use crate::geom::envelope;

use super::SegmentChain;
use super::intersector::SegmentIntersector;
use super::monotone_chain::{MonotoneChain, monotone_chains};

/// R-tree over the monotone chains of a set of segment chains.
pub struct ChainIndex {
    chains: Vec<MonotoneChain>,
    tree:   RTree<MonotoneChain>,
}

impl ChainIndex {
    pub fn new<C>(segment_chains: &[SegmentChain<C>]) -> Self {
        let mut chains = Vec::new();
        for (i, ss) in segment_chains.iter().enumerate() {
            let next_id = chains.len();
            chains.extend(monotone_chains(ss.coordinates(), i, next_id));
        }
        Self { tree: RTree::bulk_load(chains.clone()), chains }
    }

    #[inline] pub fn len(&self)      -> usize { self.chains.len() }
    #[inline] pub fn is_empty(&self) -> bool  { self.chains.is_empty() }

    /// Run `intersector` over every pair of segments (from distinct monotone
    /// chains) whose envelopes lie within `overlap_tolerance` of each other.
    pub fn process_intersections<C, I: SegmentIntersector + ?Sized>(
        &self,
        segment_chains:    &[SegmentChain<C>],
        overlap_tolerance: f64,
        intersector:       &mut I,
    ) {
        let mut overlaps = 0usize;
        for query in &self.chains {
            let search = envelope::to_aabb(&envelope::expand_by(*query.envelope(), overlap_tolerance));
            let query_pts = segment_chains[query.chain()].coordinates();

            for test in self.tree.locate_in_envelope_intersecting(&search) {
                // Each unordered pair is processed once.
                if test.id() <= query.id() { continue }

                let test_pts = segment_chains[test.chain()].coordinates();
                query.compute_overlaps(query_pts, test, test_pts, overlap_tolerance, intersector);
                overlaps += 1;
                if intersector.is_done() { return }
            }
        }
        trace!("chain index: {} monotone chains, {} overlapping pairs", self.chains.len(), overlaps);
    }
}

/// Build a [`ChainIndex`] over `chains` and run `intersector` on it.
pub fn process_intersections<C, I: SegmentIntersector + ?Sized>(
    chains:            &[SegmentChain<C>],
    overlap_tolerance: f64,
    intersector:       &mut I,
) {
    ChainIndex::new(chains).process_intersections(chains, overlap_tolerance, intersector);
}
