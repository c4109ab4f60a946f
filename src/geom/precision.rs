use geo::Coord;

use crate::error::{NodingError, Result};

/// A fixed precision grid with spacing `1 / scale`.
///
/// Rounding maps each ordinate to the nearest grid line, with ties going
/// toward positive infinity. Under that rule every point of the plane lands
/// in exactly one half-open cell `[c - w/2, c + w/2)`, which is the region a
/// [`HotPixel`](crate::HotPixel) covers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrecisionModel {
    scale: f64,
    grid_size: f64,
}

impl PrecisionModel {
    /// Precision model with `scale` grid lines per unit.
    pub fn new(scale: f64) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) { return Err(NodingError::InvalidScale(scale)) }
        Ok(Self { scale, grid_size: 1.0 / scale })
    }

    /// Precision model with grid lines `grid_size` apart.
    pub fn from_grid_size(grid_size: f64) -> Result<Self> {
        if !(grid_size.is_finite() && grid_size > 0.0) { return Err(NodingError::InvalidScale(grid_size)) }
        Ok(Self { scale: 1.0 / grid_size, grid_size })
    }

    #[inline] pub fn scale(&self) -> f64 { self.scale }

    #[inline] pub fn grid_size(&self) -> f64 { self.grid_size }

    /// Round a single ordinate onto the grid.
    pub fn make_precise_value(&self, value: f64) -> f64 {
        if !value.is_finite() { return value }
        // Coarse grids divide by the (exact) grid size so results stay exact multiples.
        if self.grid_size > 1.0 {
            round_half_up(value / self.grid_size) * self.grid_size
        } else {
            round_half_up(value * self.scale) / self.scale
        }
    }

    /// Round `coord` onto the grid.
    #[inline]
    pub fn make_precise(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord { x: self.make_precise_value(coord.x), y: self.make_precise_value(coord.y) }
    }

    /// Returns `true` if `coord` already lies on the grid.
    #[inline]
    pub fn is_precise(&self, coord: Coord<f64>) -> bool { self.make_precise(coord) == coord }
}

/// `floor(value + 0.5)`, computed without the intermediate addition so values
/// just below one half are not carried up.
#[inline]
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}
