//! Snap-rounding noder.
//!
//! Rounds every vertex of the input onto a precision grid while keeping the
//! arrangement fully noded. The grid cells that contain an input vertex or
//! an intersection are *hot pixels*; any segment passing through a hot
//! pixel is bent through the pixel's centre, and pixels reached by more than
//! one piece of linework become nodes where the linework is split.
//!
//! # Phases
//!
//! 1. Find interior intersections of the unrounded input (with a near-miss
//!    tolerance of 1/100 of a grid cell), splice them into their chains and
//!    register their pixels as nodes.
//! 2. Register a pixel for every input vertex.
//! 3. Round each chain, dropping repeated points. For every unrounded
//!    segment, add a node at the centre of each hot pixel it crosses.
//! 4. Add a node at every interior vertex whose pixel ended up a node, so
//!    all chains through a node are split there.
//! 5. Split the chains at their nodes.
//!
//! Pixel tests always use the unrounded segment; the nodes they produce are
//! written against the rounded chain.

use geo::Coord;
use log::debug;

use crate::config::SnapRoundingConfig;
use crate::error::Result;
use crate::geom::PrecisionModel;
use crate::noding::{Noder, SegmentChain, SnapRoundingIntersectionAdder, chain_index, noded_substrings};

use super::hot_pixel_index::{DEFAULT_SHUFFLE_SEED, HotPixelIndex};

/// Fully nodes linework on the grid of a [`PrecisionModel`].
///
/// Each call to [`compute_nodes`](Noder::compute_nodes) builds a fresh
/// [`HotPixelIndex`]; the index from the most recent call can be inspected
/// with [`pixel_index`](Self::pixel_index).
#[derive(Clone, Debug)]
pub struct SnapRoundingNoder {
    pm:          PrecisionModel,
    seed:        u64,
    pixel_index: Option<HotPixelIndex>,
}

impl SnapRoundingNoder {
    pub fn new(pm: PrecisionModel) -> Self {
        Self { pm, seed: DEFAULT_SHUFFLE_SEED, pixel_index: None }
    }

    pub fn from_config(config: &SnapRoundingConfig) -> Result<Self> {
        Ok(Self::new(config.precision_model()?).with_shuffle_seed(config.shuffle_seed))
    }

    /// Use `seed` for the vertex insertion shuffle.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline] pub fn precision_model(&self) -> &PrecisionModel { &self.pm }

    /// Hot pixels of the last run.
    #[inline] pub fn pixel_index(&self) -> Option<&HotPixelIndex> { self.pixel_index.as_ref() }

    /// Splice interior intersections of the unrounded chains into them and
    /// return the intersection points.
    fn find_interior_intersections<C>(&self, chains: &mut [SegmentChain<C>]) -> Vec<Coord<f64>> {
        let mut adder = SnapRoundingIntersectionAdder::new(&self.pm);
        chain_index::process_intersections(chains, adder.tolerance(), &mut adder);

        let (intersections, insertions) = adder.into_parts();
        for ins in insertions {
            chains[ins.chain].add_intersection(ins.coord, ins.segment_index);
        }
        intersections
    }

    /// Round `pts`, dropping any point equal to the one before it.
    fn round(&self, pts: &[Coord<f64>]) -> Vec<Coord<f64>> {
        let mut rounded = Vec::with_capacity(pts.len());
        for &p in pts {
            let r = self.pm.make_precise(p);
            if rounded.last() != Some(&r) { rounded.push(r) }
        }
        rounded
    }
}

impl<C: Clone> Noder<C> for SnapRoundingNoder {
    fn compute_nodes(&mut self, mut chains: Vec<SegmentChain<C>>) -> Result<Vec<SegmentChain<C>>> {
        let mut index = HotPixelIndex::with_seed(self.pm, self.seed);

        let intersections = self.find_interior_intersections(&mut chains);
        index.add_nodes(intersections.iter().copied());
        debug!("snap rounding: {} chains, {} intersection pixels", chains.len(), intersections.len());

        for chain in &chains {
            index.add_many(chain.coordinates().iter().copied());
        }
        debug!("snap rounding: {} hot pixels", index.len());

        let mut snapped = chains.iter()
            .filter_map(|chain| self.snap_chain(&mut index, chain))
            .collect::<Vec<_>>();
        debug!("snap rounding: {} of {} chains survived rounding", snapped.len(), chains.len());

        // Pixels may have become nodes after the chains through them were snapped.
        for chain in &mut snapped {
            add_vertex_nodes(&index, chain);
        }

        let noded = noded_substrings(snapped);
        debug!("snap rounding: {} noded chains", noded.len());
        self.pixel_index = Some(index);
        Ok(noded)
    }
}

impl SnapRoundingNoder {
    /// Round one chain and add a node for every hot pixel its unrounded
    /// segments cross. `None` if the chain collapses to a point.
    fn snap_chain<C: Clone>(&self, index: &mut HotPixelIndex, chain: &SegmentChain<C>) -> Option<SegmentChain<C>> {
        let pts = chain.noded_coordinates();
        let rounded = self.round(&pts);
        if rounded.len() <= 1 { return None }

        let mut snapped = SegmentChain::new(rounded, chain.context().clone());
        let mut write = 0;
        for seg in pts.windows(2) {
            let (p0, p1) = (seg[0], seg[1]);
            // Both ends in one pixel: the segment collapsed.
            if self.pm.make_precise(p1) == snapped.coordinate(write) { continue }

            snap_segment(index, p0, p1, &mut snapped, write);
            write += 1;
        }
        Some(snapped)
    }
}

/// Node `snapped` at segment `write` for each hot pixel crossed by the
/// unrounded segment `p0-p1`.
fn snap_segment<C>(index: &mut HotPixelIndex, p0: Coord<f64>, p1: Coord<f64>, snapped: &mut SegmentChain<C>, write: usize) {
    index.query(p0, p1, |hp| {
        // A pixel that only contains the segment's own endpoint is that
        // vertex's pixel; it gets a node later if it is marked as one.
        if !hp.is_node() && (hp.intersects(p0) || hp.intersects(p1)) { return }

        if hp.intersects_segment(p0, p1) {
            snapped.add_intersection(hp.coordinate(), write);
            hp.mark_node();
        }
    });
}

/// Node every interior vertex of `chain` whose pixel is a node.
fn add_vertex_nodes<C>(index: &HotPixelIndex, chain: &mut SegmentChain<C>) {
    let n = chain.len();
    for i in 1..n.saturating_sub(1) {
        let p = chain.coordinate(i);
        if index.find(p).is_some_and(|hp| hp.is_node() && hp.coordinate() == p) {
            chain.add_intersection(p, i);
        }
    }
}
