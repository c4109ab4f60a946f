pub mod kdtree;

pub use kdtree::{KdNode, KdNodeId, KdTree};
