//! Benchmarks for blade sampling, solidization and pump assembly.
//!
//! Run with: cargo bench -p blade-geom
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p blade-geom -- --save-baseline main
//! 2. After changes: cargo bench -p blade-geom -- --baseline main

use blade_geom::{
    BladeParameters, ChordDistribution, DiffuserResolution, LayerParameters, PumpLayout,
    SamplingConfig, SpanInterpolator, assemble_blades_on_hub, assemble_pump, build_blade_solid,
    sample_blade_surface, sample_blade_surface_with,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

// =============================================================================
// Test Blade
// =============================================================================

fn reference_blade() -> BladeParameters {
    let layers = [0.0, 0.25, 0.5, 0.75, 1.0]
        .into_iter()
        .zip([0.02, 0.03, 0.03, 0.02, 0.01])
        .map(|(span, max_camber)| LayerParameters {
            span,
            leading_edge_angle: 0.0,
            max_camber,
            max_thickness: 0.01,
            camber_shape: 0.4,
            plateau_start: 0.2,
            plateau_end: 0.8,
            thickness_steepness: 2.0,
            camber_sharpness: None,
            taper: None,
            radius: None,
        })
        .collect();
    BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).unwrap()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_interpolation(c: &mut Criterion) {
    let params = reference_blade();
    let interp = SpanInterpolator::new(&params);

    c.bench_function("span_interpolation_1000", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let _ = black_box(interp.profile(black_box(i as f64 / 999.0)));
            }
        })
    });
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_blade_surface");
    let params = reference_blade();

    for &(spans, chords) in &[(5, 20), (9, 64), (33, 300)] {
        group.throughput(Throughput::Elements((2 * spans * chords) as u64));
        group.bench_with_input(
            BenchmarkId::new("uniform", format!("{}x{}", spans, chords)),
            &(spans, chords),
            |b, &(s, k)| b.iter(|| sample_blade_surface(black_box(&params), s, k)),
        );
    }

    let cosine = SamplingConfig::new(9, 64).with_distribution(ChordDistribution::Cosine);
    group.bench_function("cosine/9x64", |b| {
        b.iter(|| sample_blade_surface_with(black_box(&params), black_box(&cosine)))
    });

    group.finish();
}

fn bench_solidization(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_blade_solid");
    let params = reference_blade();

    for &(spans, chords) in &[(5, 20), (9, 64), (33, 300)] {
        let grid = sample_blade_surface(&params, spans, chords).unwrap();
        group.bench_with_input(
            BenchmarkId::new("solid", format!("{}x{}", spans, chords)),
            &grid,
            |b, grid| b.iter(|| build_blade_solid(black_box(grid), true)),
        );
    }

    group.finish();
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    group.sample_size(10); // Full pumps are slow

    let params = reference_blade();
    let grid = sample_blade_surface(&params, 9, 64).unwrap();
    let blade = build_blade_solid(&grid, true).unwrap();

    group.bench_function("blade_row_12", |b| {
        b.iter(|| assemble_blades_on_hub(black_box(&blade), 12, 0.121, 0.4, 0.0, 128))
    });

    let layout = PumpLayout {
        rotor_height: 0.4,
        vane_height: 0.4,
        diffuser_resolution: DiffuserResolution {
            azimuthal: 64,
            meridional: 32,
        },
        ..PumpLayout::default()
    };
    let sampling = SamplingConfig::new(9, 64);
    group.bench_function("pump_rotor_and_vane", |b| {
        b.iter(|| assemble_pump(black_box(&params), Some(&params), &sampling, &layout))
    });

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(
    benches,
    bench_interpolation,
    bench_sampling,
    bench_solidization,
    bench_assembly,
);

criterion_main!(benches);
