use geo::Coord;
use thiserror::Error;

/// Errors raised while building a precision model or validating noded output.
#[derive(Debug, Error)]
pub enum NodingError {
    /// The precision model scale (or grid size) was zero, negative or not finite.
    #[error("scale factor must be positive and finite, got {0}")]
    InvalidScale(f64),

    /// Two segments of the output meet somewhere other than a shared node.
    #[error("found non-noded intersection at {location:?} between {segments:?}")]
    NonNodedIntersection {
        location: Coord<f64>,
        segments: [[Coord<f64>; 2]; 2],
    },

    /// The noder configuration could not be parsed.
    #[error("invalid noder configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = NodingError> = std::result::Result<T, E>;
