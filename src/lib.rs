#![doc = "Snap-rounding noder for planar linework"]
pub mod config;
pub mod error;
pub mod geom;
pub mod index;
pub mod noding;
pub mod snapround;

#[doc(inline)]
pub use config::SnapRoundingConfig;

#[doc(inline)]
pub use error::{NodingError, Result};

#[doc(inline)]
pub use geom::PrecisionModel;

#[doc(inline)]
pub use noding::{Noder, NodingValidator, SegmentChain, ValidatingNoder};

#[doc(inline)]
pub use snapround::{HotPixel, HotPixelIndex, SnapRoundingNoder, snap_round};
