//! Coordinate-level primitives shared by the index and the noders.

pub mod distance;
pub mod envelope;
pub mod precision;

pub use precision::PrecisionModel;
