//! Property-based tests for blade shape and sampling invariants.
//!
//! Run with: cargo test -p blade-geom -- proptest

use blade_geom::{
    BladeParameters, CamberShape, ChordDistribution, LayerParameters, SamplingConfig,
    SpanInterpolator, ThicknessShape, build_blade_solid, sample_blade_surface_with,
    span_positions,
};
use proptest::prelude::*;

const SPANS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

fn arb_layer(span: f64) -> impl Strategy<Value = LayerParameters> {
    (
        0.0..0.05f64,
        0.002..0.02f64,
        0.1..0.9f64,
        0.0..0.5f64,
        0.5..1.0f64,
        0.2..10.0f64,
    )
        .prop_map(move |(max_camber, max_thickness, alpha, a, b, steepness)| {
            LayerParameters {
                span,
                leading_edge_angle: 0.0,
                max_camber,
                max_thickness,
                camber_shape: alpha,
                plateau_start: a,
                plateau_end: b,
                thickness_steepness: steepness,
                camber_sharpness: None,
                taper: None,
                radius: None,
            }
        })
}

fn arb_blade() -> impl Strategy<Value = BladeParameters> {
    (
        arb_layer(SPANS[0]),
        arb_layer(SPANS[1]),
        arb_layer(SPANS[2]),
        arb_layer(SPANS[3]),
        arb_layer(SPANS[4]),
        0.2..1.0f64,
        0.1..0.5f64,
    )
        .prop_map(|(l0, l1, l2, l3, l4, angular_span, height)| {
            BladeParameters::new(angular_span, height, 0.121, 0.16, vec![l0, l1, l2, l3, l4])
                .unwrap()
        })
}

/// Five span rows with up to a few hundred uniform or cosine chord stations.
fn arb_sampling() -> impl Strategy<Value = SamplingConfig> {
    (
        3usize..400,
        prop_oneof![Just(ChordDistribution::Uniform), Just(ChordDistribution::Cosine)],
    )
        .prop_map(|(chords, distribution)| {
            SamplingConfig::new(5, chords).with_distribution(distribution)
        })
}

proptest! {
    #[test]
    fn proptest_camber_bounded_with_zero_endpoints(
        alpha in 0.01..0.99f64,
        kappa in prop::option::of(0.2..4.0f64),
        u in 0.0..=1.0f64,
    ) {
        let shape = CamberShape::new(alpha, kappa).unwrap();
        let g = shape.eval(u);
        prop_assert!((0.0..=1.0).contains(&g));
        prop_assert_eq!(shape.eval(0.0), 0.0);
        prop_assert_eq!(shape.eval(1.0), 0.0);
    }

    #[test]
    fn proptest_camber_peaks_at_alpha(alpha in 0.05..0.95f64, u in 0.0..=1.0f64) {
        let shape = CamberShape::beta(alpha).unwrap();
        prop_assert!((shape.eval(alpha) - 1.0).abs() < 1e-12);
        prop_assert!(shape.eval(u) <= shape.eval(alpha) + 1e-12);
    }

    #[test]
    fn proptest_thickness_bounded_with_zero_endpoints(
        a in 0.0..0.5f64,
        b in 0.5..=1.0f64,
        steepness in 0.2..5.0f64,
        taper in 0.0..=1.0f64,
        u in 0.0..=1.0f64,
    ) {
        let shape = ThicknessShape::new(a, b, steepness, taper).unwrap();
        let t = shape.eval(u);
        prop_assert!((0.0..=1.0).contains(&t));
        prop_assert!(shape.eval(0.0).abs() < 1e-12);
        prop_assert!(shape.eval(1.0).abs() < 1e-12);
    }

    #[test]
    fn proptest_interpolation_brackets_neighbours(blade in arb_blade(), span in 0.0..=1.0f64) {
        let profile = SpanInterpolator::new(&blade).profile(span).unwrap();
        let layers = blade.layers();
        let hi = layers.iter().position(|l| l.span >= span).unwrap();
        let lo = hi.saturating_sub(1);
        let (c0, c1) = (layers[lo].max_camber, layers[hi].max_camber);
        prop_assert!(profile.max_camber >= c0.min(c1) - 1e-15);
        prop_assert!(profile.max_camber <= c0.max(c1) + 1e-15);
        let (t0, t1) = (layers[lo].max_thickness, layers[hi].max_thickness);
        prop_assert!(profile.max_thickness >= t0.min(t1) - 1e-15);
        prop_assert!(profile.max_thickness <= t0.max(t1) + 1e-15);
    }

    #[test]
    fn proptest_upper_skin_above_lower(blade in arb_blade(), sampling in arb_sampling()) {
        let grid = sample_blade_surface_with(&blade, &sampling).unwrap();
        prop_assert!(grid.is_rectangular());
        let k = sampling.chord_samples;
        for (n, (up, low)) in grid.upper_points().iter().zip(grid.lower_points()).enumerate() {
            let j = n % k;
            if j == 0 || j + 1 == k {
                prop_assert_eq!(up, low);
            } else {
                prop_assert!(up.z > low.z, "station {} of {}: {} <= {}", j, k, up.z, low.z);
            }
        }
    }

    #[test]
    fn proptest_solid_volume_positive(blade in arb_blade(), sampling in arb_sampling()) {
        let grid = sample_blade_surface_with(&blade, &sampling).unwrap();
        let solid = build_blade_solid(&grid, true).unwrap();
        prop_assert!(solid.closed);
        prop_assert!(solid.report.is_closed_solid());
        prop_assert!(solid.signed_volume() > 0.0);
    }

    #[test]
    fn proptest_span_positions_keep_defining_layers(count in 5usize..60) {
        let positions = span_positions(&SPANS, count);
        prop_assert_eq!(positions.len(), count);
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        for span in SPANS {
            prop_assert!(positions.contains(&span));
        }
    }
}
