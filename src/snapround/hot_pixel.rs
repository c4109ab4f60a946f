use std::fmt;

use geo::Coord;
use geo::kernels::{Kernel, Orientation, RobustKernel};

use crate::error::{NodingError, Result};
use crate::geom::PrecisionModel;
use crate::geom::precision::round_half_up;

/// Half the pixel width, in scaled units.
const TOLERANCE: f64 = 0.5;

/// The square of the plane that rounds to one grid point.
///
/// The square is half-open: the left and bottom sides belong to the pixel,
/// the top and right sides belong to its neighbours. All tests are carried
/// out in scaled space, where the pixel is the unit square centred on
/// `(hpx, hpy)`.
#[derive(Clone, Debug)]
pub struct HotPixel {
    coord:   Coord<f64>,
    scale:   f64,
    hpx:     f64,
    hpy:     f64,
    is_node: bool,
}

impl HotPixel {
    /// A pixel centred on the grid point `center` of a grid with `scale`
    /// lines per unit.
    pub fn new(center: Coord<f64>, scale: f64) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) { return Err(NodingError::InvalidScale(scale)) }
        Ok(Self::scaled(center, scale))
    }

    pub(crate) fn with_precision(center: Coord<f64>, pm: &PrecisionModel) -> Self {
        Self::scaled(center, pm.scale())
    }

    fn scaled(coord: Coord<f64>, scale: f64) -> Self {
        let hpx = round_half_up(coord.x * scale);
        let hpy = round_half_up(coord.y * scale);
        Self { coord, scale, hpx, hpy, is_node: false }
    }

    #[inline] pub fn coordinate(&self)   -> Coord<f64> { self.coord }
    #[inline] pub fn scale_factor(&self) -> f64 { self.scale }
    #[inline] pub fn width(&self)        -> f64 { 1.0 / self.scale }
    #[inline] pub fn is_node(&self)      -> bool { self.is_node }

    #[inline] pub fn set_node(&mut self, is_node: bool) { self.is_node = is_node }
    #[inline] pub fn mark_node(&mut self) { self.is_node = true }

    #[inline]
    fn scale(&self, p: Coord<f64>) -> Coord<f64> {
        Coord { x: p.x * self.scale, y: p.y * self.scale }
    }

    /// Returns `true` if `p` lies in this pixel.
    pub fn intersects(&self, p: Coord<f64>) -> bool {
        let p = self.scale(p);
        p.x >= self.hpx - TOLERANCE && p.x < self.hpx + TOLERANCE
            && p.y >= self.hpy - TOLERANCE && p.y < self.hpy + TOLERANCE
    }

    /// Returns `true` if the segment `p0-p1` meets this pixel.
    pub fn intersects_segment(&self, p0: Coord<f64>, p1: Coord<f64>) -> bool {
        self.intersects_scaled(self.scale(p0), self.scale(p1))
    }

    fn intersects_scaled(&self, p0: Coord<f64>, p1: Coord<f64>) -> bool {
        // Orient the segment left to right.
        let (p, q) = if p0.x > p1.x { (p1, p0) } else { (p0, p1) };

        let minx = self.hpx - TOLERANCE;
        let maxx = self.hpx + TOLERANCE;
        let miny = self.hpy - TOLERANCE;
        let maxy = self.hpy + TOLERANCE;

        // Envelope rejection; top and right sides are open.
        if p.x.min(q.x) >= maxx { return false }
        if p.x.max(q.x) <  minx { return false }
        if p.y.min(q.y) >= maxy { return false }
        if p.y.max(q.y) <  miny { return false }

        // Axis-parallel segments that pass the envelope test must hit the
        // interior or the closed left/bottom sides.
        if p.x == q.x || p.y == q.y { return true }

        let upward = p.y < q.y;
        let orient = |x: f64, y: f64| RobustKernel::orient2d(p, q, Coord { x, y });

        // Through a corner: the outcome depends on the direction of travel.
        let ul = orient(minx, maxy);
        if ul == Orientation::Collinear { return !upward }

        let ur = orient(maxx, maxy);
        if ur == Orientation::Collinear { return upward }
        if ul != ur { return true } // top side

        // The lower-left corner is the only corner inside the pixel.
        let ll = orient(minx, miny);
        if ll == Orientation::Collinear { return true }
        if ll != ul { return true } // left side

        let lr = orient(maxx, miny);
        if lr == Orientation::Collinear { return !upward }
        if ll != lr { return true } // bottom side
        if lr != ur { return true } // right side

        false
    }
}

impl fmt::Display for HotPixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HP({} {})", self.coord.x, self.coord.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn pixel(x: f64, y: f64, scale: f64) -> HotPixel {
        HotPixel::new(coord! { x: x, y: y }, scale).unwrap()
    }

    #[test]
    fn rejects_bad_scale() {
        assert!(matches!(HotPixel::new(coord! { x: 0.0, y: 0.0 }, 0.0), Err(NodingError::InvalidScale(_))));
        assert!(HotPixel::new(coord! { x: 0.0, y: 0.0 }, -1.0).is_err());
    }

    #[test]
    fn properties() {
        let mut hp = pixel(1.5, 2.5, 2.0);
        assert_eq!(hp.coordinate(), coord! { x: 1.5, y: 2.5 });
        assert_eq!(hp.scale_factor(), 2.0);
        assert_eq!(hp.width(), 0.5);
        assert!(!hp.is_node());
        hp.mark_node();
        assert!(hp.is_node());
        hp.set_node(false);
        assert!(!hp.is_node());
        assert_eq!(hp.to_string(), "HP(1.5 2.5)");
    }

    #[test]
    fn point_membership_is_half_open() {
        let hp = pixel(1.0, 1.0, 1.0);
        assert!(hp.intersects(coord! { x: 1.0, y: 1.0 }));
        assert!(hp.intersects(coord! { x: 0.5, y: 0.5 }));
        assert!(hp.intersects(coord! { x: 0.5, y: 1.49 }));
        assert!(!hp.intersects(coord! { x: 1.5, y: 1.0 }));
        assert!(!hp.intersects(coord! { x: 1.0, y: 1.5 }));
        assert!(!hp.intersects(coord! { x: 0.49, y: 1.0 }));
    }

    #[test]
    fn point_membership_scaled() {
        let hp = pixel(0.3, -0.2, 10.0);
        assert!(hp.intersects(coord! { x: 0.26, y: -0.24 }));
        assert!(!hp.intersects(coord! { x: 0.36, y: -0.2 }));
    }

    #[test]
    fn crossing_segments() {
        let hp = pixel(1.0, 1.0, 1.0);
        assert!(hp.intersects_segment(coord! { x: 0.0, y: 0.0 }, coord! { x: 2.0, y: 2.0 }));
        assert!(hp.intersects_segment(coord! { x: 0.0, y: 2.0 }, coord! { x: 2.0, y: 0.0 }));
        assert!(hp.intersects_segment(coord! { x: 0.0, y: 1.2 }, coord! { x: 3.0, y: 1.3 }));
        assert!(!hp.intersects_segment(coord! { x: 0.0, y: 3.0 }, coord! { x: 3.0, y: 1.6 }));
        // Entirely inside.
        assert!(hp.intersects_segment(coord! { x: 0.8, y: 0.9 }, coord! { x: 1.2, y: 1.1 }));
    }

    #[test]
    fn axis_parallel_segments_respect_open_sides() {
        let hp = pixel(1.0, 1.0, 1.0);
        // Along the closed left side.
        assert!(hp.intersects_segment(coord! { x: 0.5, y: -1.0 }, coord! { x: 0.5, y: 3.0 }));
        // Along the open right side.
        assert!(!hp.intersects_segment(coord! { x: 1.5, y: -1.0 }, coord! { x: 1.5, y: 3.0 }));
        // Along the closed bottom side.
        assert!(hp.intersects_segment(coord! { x: -1.0, y: 0.5 }, coord! { x: 3.0, y: 0.5 }));
        // Along the open top side.
        assert!(!hp.intersects_segment(coord! { x: -1.0, y: 1.5 }, coord! { x: 3.0, y: 1.5 }));
    }

    #[test]
    fn corner_touches_follow_direction_of_travel() {
        let hp = pixel(0.0, 0.0, 1.0);

        // Diagonal touching only the upper-left corner from below-left.
        assert!(!hp.intersects_segment(coord! { x: -1.5, y: -0.5 }, coord! { x: 0.5, y: 1.5 }));
        // Diagonal through the upper-left corner heading down crosses the interior.
        assert!(hp.intersects_segment(coord! { x: -1.0, y: 1.0 }, coord! { x: 0.5, y: -0.5 }));

        // Touching only the upper-right corner from above-left.
        assert!(!hp.intersects_segment(coord! { x: -0.5, y: 1.5 }, coord! { x: 1.5, y: -0.5 }));
        // Through the upper-right corner heading up, having crossed the interior.
        assert!(hp.intersects_segment(coord! { x: -1.0, y: -1.0 }, coord! { x: 1.0, y: 1.0 }));

        // Touching only the lower-right corner from below-left.
        assert!(!hp.intersects_segment(coord! { x: -0.5, y: -1.5 }, coord! { x: 1.5, y: 0.5 }));

        // Touching only the lower-left corner still counts: it is inside the pixel.
        assert!(hp.intersects_segment(coord! { x: -1.5, y: 0.5 }, coord! { x: 0.5, y: -1.5 }));
    }

    #[test]
    fn segment_missing_pixel_but_inside_envelope() {
        let hp = pixel(0.0, 0.0, 1.0);
        assert!(!hp.intersects_segment(coord! { x: -2.0, y: 0.0 }, coord! { x: 0.0, y: 2.0 }));
    }
}
