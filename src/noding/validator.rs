use log::debug;

use crate::error::{NodingError, Result};

use super::intersector::{InteriorIntersection, InteriorIntersectionFinder};
use super::{Noder, SegmentChain, chain_index};

/// Checks that a set of chains is fully noded: chains meet only at shared
/// endpoints.
pub struct NodingValidator<'a, C> {
    chains: &'a [SegmentChain<C>],
}

impl<'a, C> NodingValidator<'a, C> {
    pub fn new(chains: &'a [SegmentChain<C>]) -> Self { Self { chains } }

    /// The first non-noded intersection found, if any.
    pub fn find_intersection(&self) -> Option<InteriorIntersection> {
        let mut finder = InteriorIntersectionFinder::new();
        chain_index::process_intersections(self.chains, 0.0, &mut finder);
        finder.intersection().copied()
    }

    pub fn is_valid(&self) -> bool { self.find_intersection().is_none() }

    pub fn check_valid(&self) -> Result<()> {
        match self.find_intersection() {
            None => Ok(()),
            Some(InteriorIntersection { location, segments }) => {
                Err(NodingError::NonNodedIntersection { location, segments })
            }
        }
    }
}

/// Runs another noder and validates its output.
pub struct ValidatingNoder<N> {
    inner: N,
}

impl<N> ValidatingNoder<N> {
    pub fn new(inner: N) -> Self { Self { inner } }

    #[inline] pub fn inner(&self) -> &N { &self.inner }
    #[inline] pub fn into_inner(self) -> N { self.inner }
}

impl<C, N: Noder<C>> Noder<C> for ValidatingNoder<N> {
    fn compute_nodes(&mut self, chains: Vec<SegmentChain<C>>) -> Result<Vec<SegmentChain<C>>> {
        let noded = self.inner.compute_nodes(chains)?;
        NodingValidator::new(&noded).check_valid()?;
        debug!("validated {} noded chains", noded.len());
        Ok(noded)
    }
}
