use geo::{Coord, Rect};
use rstar::AABB;

/// Envelope of the segment `p0-p1`.
#[inline]
pub fn segment_envelope(p0: Coord<f64>, p1: Coord<f64>) -> Rect<f64> { Rect::new(p0, p1) }

/// `rect` grown by `distance` on every side.
#[inline]
pub fn expand_by(rect: Rect<f64>, distance: f64) -> Rect<f64> {
    let (min, max) = (rect.min(), rect.max());
    Rect::new(
        Coord { x: min.x - distance, y: min.y - distance },
        Coord { x: max.x + distance, y: max.y + distance },
    )
}

/// Closed containment test (boundary counts as inside).
#[inline]
pub fn covers(rect: &Rect<f64>, p: Coord<f64>) -> bool {
    let (min, max) = (rect.min(), rect.max());
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

/// Closed overlap test between two envelopes.
#[inline]
pub fn intersects(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x && b.min().x <= a.max().x && a.min().y <= b.max().y && b.min().y <= a.max().y
}

#[inline]
pub fn to_aabb(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(rect.min().into(), rect.max().into())
}
