//! Noding: turning arbitrary linework into chains that meet only at their
//! endpoints.

pub mod chain_index;
pub mod intersector;
pub mod line_intersection;
pub mod monotone_chain;
pub mod segment_chain;
pub mod validator;

pub use intersector::{InteriorIntersectionFinder, SegmentIntersector, SegmentRef, SnapRoundingIntersectionAdder};
pub use segment_chain::{SegmentChain, SegmentNode, noded_substrings};
pub use validator::{NodingValidator, ValidatingNoder};

use crate::error::Result;

/// Computes a fully noded arrangement of a set of segment chains.
///
/// The output chains carry the context of the input chain they came from.
pub trait Noder<C> {
    fn compute_nodes(&mut self, chains: Vec<SegmentChain<C>>) -> Result<Vec<SegmentChain<C>>>;
}
