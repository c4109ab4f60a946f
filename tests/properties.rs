// Randomised checks of the snap-rounding guarantees.

use geo::{Coord, coord};
use proptest::prelude::*;
use snapround::noding::line_intersection::intersect;
use snapround::{Noder, NodingValidator, PrecisionModel, SegmentChain, SnapRoundingNoder};

fn point() -> impl Strategy<Value = Coord<f64>> {
    (0.0..20.0f64, 0.0..20.0f64).prop_map(|(x, y)| coord! { x: x, y: y })
}

/// Half-unit lattice points: repeated vertices, collinear overlaps and
/// rounding ties turn up often.
fn grid_point() -> impl Strategy<Value = Coord<f64>> {
    (0..=20i32, 0..=20i32).prop_map(|(x, y)| coord! { x: x as f64 / 2.0, y: y as f64 / 2.0 })
}

fn chains_of<S: Strategy<Value = Coord<f64>>>(point: S) -> impl Strategy<Value = Vec<SegmentChain<usize>>> {
    prop::collection::vec(prop::collection::vec(point, 2..5), 1..8).prop_map(|lines| {
        lines.into_iter().enumerate().map(|(i, pts)| SegmentChain::new(pts, i)).collect()
    })
}

fn chains() -> impl Strategy<Value = Vec<SegmentChain<usize>>> {
    chains_of(prop_oneof![grid_point(), point()])
}

fn lattice_chains() -> impl Strategy<Value = Vec<SegmentChain<usize>>> {
    chains_of(grid_point())
}

fn scale() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![0.5, 1.0, 2.0, 4.0, 10.0])
}

fn node(scale: f64, chains: Vec<SegmentChain<usize>>) -> Vec<SegmentChain<usize>> {
    SnapRoundingNoder::new(PrecisionModel::new(scale).unwrap()).compute_nodes(chains).unwrap()
}

fn source_points(chains: &[SegmentChain<usize>]) -> Vec<Coord<f64>> {
    let segments = chains.iter()
        .flat_map(|c| c.coordinates().windows(2).map(|w| (w[0], w[1])))
        .collect::<Vec<_>>();

    let mut points = chains.iter().flat_map(|c| c.coordinates().iter().copied()).collect::<Vec<_>>();
    for (i, &(p0, p1)) in segments.iter().enumerate() {
        for &(q0, q1) in &segments[i + 1..] {
            if let Some(int) = intersect(p0, p1, q0, q1) { points.extend(int.points) }
        }
    }
    points
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn vertices_are_on_grid(scale in scale(), input in chains()) {
        let pm = PrecisionModel::new(scale).unwrap();
        for c in node(scale, input).iter().flat_map(|c| c.coordinates()) {
            prop_assert!(pm.is_precise(*c), "{c:?} is off the grid");
        }
    }

    #[test]
    fn vertices_stay_near_their_sources(scale in scale(), input in chains()) {
        let sources = source_points(&input);
        let bound = 2f64.sqrt() / (2.0 * scale) + 1e-9;
        for c in node(scale, input).iter().flat_map(|c| c.coordinates()) {
            let nearest = sources.iter().map(|s| (s.x - c.x).hypot(s.y - c.y)).fold(f64::INFINITY, f64::min);
            prop_assert!(nearest <= bound, "{c:?} is {nearest} from every source");
        }
    }

    #[test]
    fn output_is_fully_noded(scale in scale(), input in chains()) {
        let out = node(scale, input);
        let found = NodingValidator::new(&out).find_intersection();
        prop_assert!(found.is_none(), "{found:?}");
    }

    #[test]
    fn chains_have_no_repeated_points(scale in scale(), input in chains()) {
        for c in node(scale, input) {
            prop_assert!(c.len() >= 2);
            prop_assert!(c.coordinates().windows(2).all(|w| w[0] != w[1]));
        }
    }

    #[test]
    fn contexts_stay_in_input_order(scale in scale(), input in chains()) {
        let n = input.len();
        let contexts = node(scale, input).iter().map(|c| *c.context()).collect::<Vec<_>>();
        prop_assert!(contexts.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(contexts.iter().all(|&c| c < n));
    }

    #[test]
    fn lattice_input_is_fully_noded(scale in scale(), input in lattice_chains()) {
        let pm = PrecisionModel::new(scale).unwrap();
        let out = node(scale, input);
        prop_assert!(out.iter().flat_map(|c| c.coordinates()).all(|c| pm.is_precise(*c)));
        let found = NodingValidator::new(&out).find_intersection();
        prop_assert!(found.is_none(), "{found:?}");
    }
}
