//! Full blade surface sampling.
//!
//! The blade is sampled on a span × chord grid. Every span row uses the same
//! chord stations, so the grid is rectangular and can be triangulated with a
//! fixed pattern. Each row's `(θ, z)` section is placed on a cylinder of the
//! row radius: `(x, y, z) = (R cos θ, R sin θ, z)`.

use blade_mesh::OperationTimer;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BladeError, BladeResult};
use crate::layer::{ChordDistribution, LayerProfileBuilder, LayerSection};
use crate::params::{BladeParameters, LAYER_COUNT};
use crate::span::SpanInterpolator;

/// Fewest chord stations that still give an interior station.
pub const MIN_CHORD_SAMPLES: usize = 3;

/// Sample counts and chord spacing, passed explicitly per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    /// Span rows S, including every defining layer.
    pub span_samples: usize,
    /// Chord stations K per row.
    pub chord_samples: usize,
    /// Chord station spacing shared by all rows.
    pub chord_distribution: ChordDistribution,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            span_samples: 9,
            chord_samples: 64,
            chord_distribution: ChordDistribution::Uniform,
        }
    }
}

impl SamplingConfig {
    /// Uniform chord spacing with the given counts.
    pub fn new(span_samples: usize, chord_samples: usize) -> Self {
        Self {
            span_samples,
            chord_samples,
            chord_distribution: ChordDistribution::Uniform,
        }
    }

    pub fn with_distribution(mut self, distribution: ChordDistribution) -> Self {
        self.chord_distribution = distribution;
        self
    }

    /// Reject counts that cannot hold the defining layers or an interior station.
    pub fn validate(&self) -> BladeResult<()> {
        if self.span_samples < LAYER_COUNT {
            return Err(BladeError::invalid_field(
                "span_samples",
                self.span_samples,
                format!("must be at least {} (one row per defining layer)", LAYER_COUNT),
            ));
        }
        if self.chord_samples < MIN_CHORD_SAMPLES {
            return Err(BladeError::invalid_field(
                "chord_samples",
                self.chord_samples,
                format!("must be at least {}", MIN_CHORD_SAMPLES),
            ));
        }
        Ok(())
    }
}

/// `count` increasing span positions containing every defining span.
///
/// The rows beyond the defining ones are shared out over the intervals in
/// proportion to their width (largest remainder, ties to the lower interval)
/// and spaced evenly inside each interval.
pub fn span_positions(defining: &[f64], count: usize) -> Vec<f64> {
    let intervals = defining.len().saturating_sub(1);
    if intervals == 0 {
        return defining.to_vec();
    }

    let extra = count.saturating_sub(defining.len());
    let total = defining[intervals] - defining[0];
    let quotas: Vec<f64> = defining
        .windows(2)
        .map(|w| extra as f64 * (w[1] - w[0]) / total)
        .collect();
    let mut shares: Vec<usize> = quotas.iter().map(|q| q.floor() as usize).collect();

    let assigned: usize = shares.iter().sum();
    let mut order: Vec<usize> = (0..intervals).collect();
    order.sort_by(|&a, &b| {
        let frac_a = quotas[a] - quotas[a].floor();
        let frac_b = quotas[b] - quotas[b].floor();
        frac_b.total_cmp(&frac_a)
    });
    for &interval in order.iter().take(extra.saturating_sub(assigned)) {
        shares[interval] += 1;
    }

    let mut positions = Vec::with_capacity(defining.len() + extra);
    for (i, window) in defining.windows(2).enumerate() {
        let (lo, hi) = (window[0], window[1]);
        positions.push(lo);
        let n = shares[i];
        positions.extend((1..=n).map(|k| lo + (hi - lo) * k as f64 / (n + 1) as f64));
    }
    positions.push(defining[intervals]);
    positions
}

/// Sampled blade surface: S span rows × K chord stations per skin.
///
/// Points are stored row-major (`span_index * K + chord_index`). The first and
/// last station of every row are shared by both skins (leading and trailing
/// edges).
#[derive(Debug, Clone, PartialEq)]
pub struct BladeSurfaceGrid {
    span_positions: Vec<f64>,
    stations: Vec<f64>,
    hub_radius: f64,
    sections: Vec<LayerSection>,
    upper: Vec<Point3<f64>>,
    lower: Vec<Point3<f64>>,
    camber: Vec<Point3<f64>>,
}

impl BladeSurfaceGrid {
    /// Number of span rows S.
    pub fn span_count(&self) -> usize {
        self.span_positions.len()
    }

    /// Number of chord stations K.
    pub fn chord_count(&self) -> usize {
        self.stations.len()
    }

    pub fn span_positions(&self) -> &[f64] {
        &self.span_positions
    }

    pub fn stations(&self) -> &[f64] {
        &self.stations
    }

    /// Radius of the hub the blade root sits on.
    pub fn hub_radius(&self) -> f64 {
        self.hub_radius
    }

    /// Per-row sections in the (θ, z) plane.
    pub fn sections(&self) -> &[LayerSection] {
        &self.sections
    }

    fn row(points: &[Point3<f64>], k: usize, span_index: usize) -> &[Point3<f64>] {
        &points[span_index * k..(span_index + 1) * k]
    }

    pub fn upper_row(&self, span_index: usize) -> &[Point3<f64>] {
        Self::row(&self.upper, self.chord_count(), span_index)
    }

    pub fn lower_row(&self, span_index: usize) -> &[Point3<f64>] {
        Self::row(&self.lower, self.chord_count(), span_index)
    }

    /// Camber line of one row in Cartesian coordinates.
    pub fn camber_row(&self, span_index: usize) -> &[Point3<f64>] {
        Self::row(&self.camber, self.chord_count(), span_index)
    }

    pub fn upper(&self, span_index: usize, chord_index: usize) -> Point3<f64> {
        self.upper[span_index * self.chord_count() + chord_index]
    }

    pub fn lower(&self, span_index: usize, chord_index: usize) -> Point3<f64> {
        self.lower[span_index * self.chord_count() + chord_index]
    }

    /// Leading edge point of every row.
    pub fn leading_edge(&self) -> Vec<Point3<f64>> {
        (0..self.span_count()).map(|i| self.upper(i, 0)).collect()
    }

    /// Trailing edge point of every row.
    pub fn trailing_edge(&self) -> Vec<Point3<f64>> {
        let last = self.chord_count() - 1;
        (0..self.span_count()).map(|i| self.upper(i, last)).collect()
    }

    /// Every row has K points per skin and shares its edge points.
    pub fn is_rectangular(&self) -> bool {
        let k = self.chord_count();
        let s = self.span_count();
        k >= 2
            && self.upper.len() == s * k
            && self.lower.len() == s * k
            && self.camber.len() == s * k
            && (0..s).all(|i| {
                self.upper(i, 0) == self.lower(i, 0) && self.upper(i, k - 1) == self.lower(i, k - 1)
            })
    }

    /// Axial extent `(z_min, z_max)` over both skins.
    pub fn z_range(&self) -> (f64, f64) {
        self.upper
            .iter()
            .chain(&self.lower)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.z), hi.max(p.z))
            })
    }

    /// All upper points, row-major.
    pub fn upper_points(&self) -> &[Point3<f64>] {
        &self.upper
    }

    /// All lower points, row-major.
    pub fn lower_points(&self) -> &[Point3<f64>] {
        &self.lower
    }
}

/// Sample the blade with `span_samples` rows and `chord_samples` uniformly
/// spaced stations.
pub fn sample_blade_surface(
    params: &BladeParameters,
    span_samples: usize,
    chord_samples: usize,
) -> BladeResult<BladeSurfaceGrid> {
    sample_blade_surface_with(params, &SamplingConfig::new(span_samples, chord_samples))
}

/// Sample the blade with an explicit configuration.
pub fn sample_blade_surface_with(
    params: &BladeParameters,
    config: &SamplingConfig,
) -> BladeResult<BladeSurfaceGrid> {
    config.validate()?;
    let _timer = OperationTimer::new("sample_blade_surface");

    let interpolator = SpanInterpolator::new(params);
    let defining: Vec<f64> = interpolator.spans().collect();
    let spans = span_positions(&defining, config.span_samples);

    let stations = config.chord_distribution.stations(config.chord_samples);
    let builder = LayerProfileBuilder::new(
        params.angular_span(),
        params.height(),
        params.z0(),
        stations.clone(),
    );

    let total = spans.len() * stations.len();
    let mut upper = Vec::with_capacity(total);
    let mut lower = Vec::with_capacity(total);
    let mut camber = Vec::with_capacity(total);
    let mut sections = Vec::with_capacity(spans.len());

    for (span_index, &span) in spans.iter().enumerate() {
        let profile = interpolator.profile(span)?;
        let section = builder.build(span_index, &profile)?;

        let radius = section.radius;
        for (j, &theta) in section.theta.iter().enumerate() {
            let (sin, cos) = theta.sin_cos();
            let (x, y) = (radius * cos, radius * sin);
            upper.push(Point3::new(x, y, section.upper[j]));
            lower.push(Point3::new(x, y, section.lower[j]));
            camber.push(Point3::new(x, y, section.camber[j]));
        }

        debug!(span_index, span, radius, "Sampled span row");
        sections.push(section);
    }

    info!(
        span_rows = spans.len(),
        chord_stations = stations.len(),
        "Sampled blade surface"
    );

    Ok(BladeSurfaceGrid {
        span_positions: spans,
        stations,
        hub_radius: params.hub_radius(),
        sections,
        upper,
        lower,
        camber,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BladeErrorCode;
    use crate::params::tests::reference_blade;

    const DEFINING: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

    #[test]
    fn test_span_positions_without_extra_rows() {
        assert_eq!(span_positions(&DEFINING, 5), DEFINING.to_vec());
    }

    #[test]
    fn test_span_positions_even_share() {
        let positions = span_positions(&DEFINING, 9);
        assert_eq!(positions, vec![0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0]);
    }

    #[test]
    fn test_span_positions_remainder_goes_low() {
        let positions = span_positions(&DEFINING, 7);
        assert_eq!(positions, vec![0.0, 0.125, 0.25, 0.375, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_span_positions_uneven_intervals() {
        let positions = span_positions(&[0.0, 0.1, 0.2, 0.3, 1.0], 12);
        assert_eq!(positions.len(), 12);
        assert!(positions.windows(2).all(|w| w[1] > w[0]));
        for s in [0.0, 0.1, 0.2, 0.3, 1.0] {
            assert!(positions.contains(&s));
        }
        // The wide last interval receives most of the extra rows.
        assert_eq!(positions.iter().filter(|&&p| p > 0.3).count(), 6);
    }

    #[test]
    fn test_reference_grid_shape() {
        let grid = sample_blade_surface(&reference_blade(), 5, 20).unwrap();
        assert_eq!(grid.span_count(), 5);
        assert_eq!(grid.chord_count(), 20);
        assert!(grid.is_rectangular());
        assert_eq!(grid.upper_points().len() + grid.lower_points().len(), 200);
        assert_eq!(grid.span_positions(), &DEFINING);
    }

    #[test]
    fn test_rows_sit_on_their_radius() {
        let grid = sample_blade_surface(&reference_blade(), 9, 16).unwrap();
        for (i, section) in grid.sections().iter().enumerate() {
            for p in grid.upper_row(i).iter().chain(grid.lower_row(i)) {
                let r = (p.x * p.x + p.y * p.y).sqrt();
                assert!((r - section.radius).abs() < 1e-12);
            }
        }
        assert_eq!(grid.sections()[0].radius, 0.121);
        assert!((grid.sections()[8].radius - 0.16).abs() < 1e-15);
    }

    #[test]
    fn test_edges_and_extent() {
        let grid = sample_blade_surface(&reference_blade(), 5, 10).unwrap();
        let le = grid.leading_edge();
        let te = grid.trailing_edge();
        assert_eq!(le.len(), 5);
        assert!(le.iter().all(|p| p.z == 0.0));
        assert!(te.iter().all(|p| (p.z - 0.3).abs() < 1e-15));

        let (z_min, z_max) = grid.z_range();
        assert!(z_min <= 0.0 && z_min > -0.05);
        assert!(z_max >= 0.3 - 1e-15 && z_max < 0.35);
    }

    #[test]
    fn test_sample_count_validation() {
        let err = sample_blade_surface(&reference_blade(), 4, 20).unwrap_err();
        assert_eq!(err.code(), BladeErrorCode::InvalidBladeParameters);
        let err = sample_blade_surface(&reference_blade(), 5, 2).unwrap_err();
        assert!(err.to_string().contains("chord_samples"));
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let params = reference_blade();
        let config = SamplingConfig::new(11, 33).with_distribution(ChordDistribution::Cosine);
        let a = sample_blade_surface_with(&params, &config).unwrap();
        let b = sample_blade_surface_with(&params, &config).unwrap();
        assert_eq!(a, b);
    }
}
