use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::kernels::{Kernel, Orientation, RobustKernel};
use geo::{Coord, Line};
use smallvec::{SmallVec, smallvec};

use crate::geom::envelope;

/// How two segments meet.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentIntersection {
    /// One point, or the two ends of a collinear overlap.
    pub points:    SmallVec<[Coord<f64>; 2]>,
    /// A single crossing point interior to both segments.
    pub is_proper: bool,
}

impl SegmentIntersection {
    /// Returns `true` if some intersection point is not an endpoint of
    /// `p0-p1` or not an endpoint of `q0-q1`.
    pub fn is_interior(&self, p0: Coord<f64>, p1: Coord<f64>, q0: Coord<f64>, q1: Coord<f64>) -> bool {
        self.points.iter().any(|&pt| (pt != p0 && pt != p1) || (pt != q0 && pt != q1))
    }
}

/// Intersect the segments `p0-p1` and `q0-q1`.
pub fn intersect(p0: Coord<f64>, p1: Coord<f64>, q0: Coord<f64>, q1: Coord<f64>) -> Option<SegmentIntersection> {
    let single = |pt| Some(SegmentIntersection { points: smallvec![pt], is_proper: false });
    match (p0 == p1, q0 == q1) {
        (true, true) => (p0 == q0).then(|| SegmentIntersection { points: smallvec![p0], is_proper: false }),
        (true, false) => if point_on_segment(p0, q0, q1) { single(p0) } else { None },
        (false, true) => if point_on_segment(q0, p0, p1) { single(q0) } else { None },
        (false, false) => match line_intersection(Line::new(p0, p1), Line::new(q0, q1))? {
            LineIntersection::SinglePoint { intersection, is_proper } => {
                Some(SegmentIntersection { points: smallvec![intersection], is_proper })
            }
            LineIntersection::Collinear { intersection } => {
                let mut points = smallvec![intersection.start];
                if intersection.end != intersection.start { points.push(intersection.end) }
                Some(SegmentIntersection { points, is_proper: false })
            }
        },
    }
}

fn point_on_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> bool {
    envelope::covers(&envelope::segment_envelope(a, b), p)
        && RobustKernel::orient2d(a, b, p) == Orientation::Collinear
}
