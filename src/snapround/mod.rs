pub mod geometry;
pub mod hot_pixel;
pub mod hot_pixel_index;
pub mod noder;

pub use geometry::snap_round;
pub use hot_pixel::HotPixel;
pub use hot_pixel_index::HotPixelIndex;
pub use noder::SnapRoundingNoder;
