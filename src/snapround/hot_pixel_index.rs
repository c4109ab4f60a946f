use geo::Coord;
use log::trace;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::geom::{PrecisionModel, envelope};
use crate::index::KdTree;

use super::HotPixel;

/// Seed for the vertex shuffle; fixed so noding is reproducible.
pub const DEFAULT_SHUFFLE_SEED: u64 = 13;

/// The set of hot pixels for one noding run, indexed by their rounded
/// centre.
///
/// At most one pixel exists per grid point. A grid point that is reached
/// twice (two input points round to it) becomes a node.
#[derive(Clone, Debug)]
pub struct HotPixelIndex {
    pm:   PrecisionModel,
    seed: u64,
    tree: KdTree<HotPixel>,
}

impl HotPixelIndex {
    pub fn new(pm: PrecisionModel) -> Self { Self::with_seed(pm, DEFAULT_SHUFFLE_SEED) }

    pub fn with_seed(pm: PrecisionModel, seed: u64) -> Self {
        Self { pm, seed, tree: KdTree::new() }
    }

    #[inline] pub fn precision_model(&self) -> &PrecisionModel { &self.pm }
    #[inline] pub fn len(&self)      -> usize { self.tree.len() }
    #[inline] pub fn is_empty(&self) -> bool  { self.tree.is_empty() }

    /// Height of the underlying k-d tree.
    #[inline] pub fn depth(&self) -> usize { self.tree.depth() }

    /// All pixels in creation order.
    pub fn pixels(&self) -> impl Iterator<Item = &HotPixel> + '_ { self.tree.nodes().map(|n| &n.data) }

    /// The pixel for `p`'s grid point, creating it if needed. A pixel that
    /// already existed is marked as a node.
    pub fn add(&mut self, p: Coord<f64>) -> &mut HotPixel {
        let center = self.pm.make_precise(p);
        let id = match self.tree.find(center) {
            Some(id) => {
                self.tree.node_mut(id).data.mark_node();
                id
            }
            None => self.tree.insert(center, HotPixel::with_precision(center, &self.pm)),
        };
        &mut self.tree.node_mut(id).data
    }

    /// Add ordinary vertices. Points are inserted in a seeded shuffled order
    /// so that sorted input does not degrade the tree into a list.
    pub fn add_many(&mut self, points: impl IntoIterator<Item = Coord<f64>>) {
        let mut points = points.into_iter().collect::<Vec<_>>();
        let mut rng = StdRng::seed_from_u64(self.seed);
        points.shuffle(&mut rng);

        for p in points {
            self.add(p);
        }
        trace!("hot pixel index: {} pixels, depth {}", self.len(), self.depth());
    }

    /// Add points that must become nodes (true intersections).
    pub fn add_nodes(&mut self, points: impl IntoIterator<Item = Coord<f64>>) {
        for p in points {
            self.add(p).mark_node();
        }
    }

    /// The existing pixel for `p`'s grid point.
    pub fn find(&self, p: Coord<f64>) -> Option<&HotPixel> {
        let center = self.pm.make_precise(p);
        self.tree.find(center).map(|id| &self.tree.node(id).data)
    }

    /// Visit every pixel that might intersect the segment `p0-p1`.
    ///
    /// The segment envelope is grown by one pixel width, so candidates
    /// include pixels whose centre lies up to a full width outside it.
    /// Callers must still test each candidate with
    /// [`HotPixel::intersects_segment`].
    pub fn query(&mut self, p0: Coord<f64>, p1: Coord<f64>, mut visit: impl FnMut(&mut HotPixel)) {
        let env = envelope::expand_by(envelope::segment_envelope(p0, p1), self.pm.grid_size());
        for id in self.tree.query_ids(&env) {
            visit(&mut self.tree.node_mut(id).data);
        }
    }
}
