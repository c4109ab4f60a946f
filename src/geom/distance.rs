use geo::Coord;

#[inline]
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 { (a.x - b.x).hypot(a.y - b.y) }

/// Euclidean distance from `p` to the closed segment `a-b`.
pub fn point_segment_distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    if a == b { return distance(p, a) }

    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / (dx * dx + dy * dy);
    if t <= 0.0 { return distance(p, a) }
    if t >= 1.0 { return distance(p, b) }

    // Perpendicular distance via the cross product avoids building the foot point.
    ((a.y - p.y) * dx - (a.x - p.x) * dy).abs() / dx.hypot(dy)
}
