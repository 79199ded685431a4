//! Per-layer section curves in the (θ, z) plane.
//!
//! A section's chord runs from `(θ0, z0)` to `(θ0 + Θ, z0 + H)`. At chord
//! coordinate `u` the camber line sits at `z0 + u·H - h_max·γ(u)` and the two
//! skins are offset from it by `± t_max·τ(u)`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{BladeError, BladeResult};
use crate::span::LayerProfile;

/// Distribution of chordwise stations over `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordDistribution {
    /// Evenly spaced stations.
    #[default]
    Uniform,
    /// Half-cosine spacing, clustered at both edges.
    Cosine,
}

impl ChordDistribution {
    /// `count` stations with exact endpoints 0 and 1.
    ///
    /// `count` must be at least 2.
    pub fn stations(self, count: usize) -> Vec<f64> {
        let last = count.saturating_sub(1).max(1) as f64;
        let mut stations: Vec<f64> = (0..count)
            .map(|i| {
                let s = i as f64 / last;
                match self {
                    ChordDistribution::Uniform => s,
                    ChordDistribution::Cosine => 0.5 * (1.0 - (PI * s).cos()),
                }
            })
            .collect();
        if let Some(first) = stations.first_mut() {
            *first = 0.0;
        }
        if count > 1
            && let Some(end) = stations.last_mut()
        {
            *end = 1.0;
        }
        stations
    }
}

/// One sampled section: camber line and both skins at shared stations.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSection {
    /// Span position r' of the section.
    pub span: f64,
    /// Radial placement of the section.
    pub radius: f64,
    /// Chord stations `u`.
    pub stations: Vec<f64>,
    /// Angle at each station, radians.
    pub theta: Vec<f64>,
    /// Upper skin height at each station.
    pub upper: Vec<f64>,
    /// Lower skin height at each station.
    pub lower: Vec<f64>,
    /// Camber line height at each station.
    pub camber: Vec<f64>,
}

impl LayerSection {
    /// Number of chord stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Local thickness `upper - lower` at each station.
    pub fn thickness(&self) -> impl Iterator<Item = f64> + '_ {
        self.upper.iter().zip(&self.lower).map(|(u, l)| u - l)
    }
}

/// Builds section curves for resolved layer profiles.
#[derive(Debug, Clone)]
pub struct LayerProfileBuilder {
    angular_span: f64,
    height: f64,
    z0: f64,
    stations: Vec<f64>,
}

impl LayerProfileBuilder {
    /// A builder for chords of angular extent `angular_span` and axial
    /// extent `height` starting at axial datum `z0`.
    pub fn new(angular_span: f64, height: f64, z0: f64, stations: Vec<f64>) -> Self {
        Self {
            angular_span,
            height,
            z0,
            stations,
        }
    }

    pub fn stations(&self) -> &[f64] {
        &self.stations
    }

    /// Sample one section.
    ///
    /// Fails with `DegenerateSurface` when the half thickness `t_max · τ(u)`
    /// is negative or NaN, or zero at an interior station; `span_index` is
    /// reported in the error. Interior upper points always lie strictly above
    /// the lower ones, even where the thickness is below `f64` resolution.
    pub fn build(&self, span_index: usize, profile: &LayerProfile) -> BladeResult<LayerSection> {
        let camber_fn = profile.camber()?;
        let thickness_fn = profile.thickness()?;

        let count = self.stations.len();
        let mut section = LayerSection {
            span: profile.span,
            radius: profile.radius,
            stations: self.stations.clone(),
            theta: Vec::with_capacity(count),
            upper: Vec::with_capacity(count),
            lower: Vec::with_capacity(count),
            camber: Vec::with_capacity(count),
        };

        for (chord_index, &u) in self.stations.iter().enumerate() {
            let mid = self.z0 + u * self.height - profile.max_camber * camber_fn.eval(u);
            let half = profile.max_thickness * thickness_fn.eval(u);
            let (mut upper, lower) = (mid + half, mid - half);

            let interior = chord_index > 0 && chord_index + 1 < count;
            if half.is_nan() || half < 0.0 || (interior && half == 0.0) {
                return Err(BladeError::DegenerateSurface {
                    span_index,
                    chord_index,
                    u,
                    upper,
                    lower,
                });
            }
            // A positive half thickness below the resolution of `mid` rounds
            // both skins onto it; keep the upper skin one step above.
            if interior && upper <= lower {
                upper = lower.next_up();
            }

            section
                .theta
                .push(profile.leading_edge_angle + u * self.angular_span);
            section.camber.push(mid);
            section.upper.push(upper);
            section.lower.push(lower);
        }

        Ok(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BladeErrorCode;
    use crate::params::tests::reference_blade;
    use crate::span::SpanInterpolator;

    fn reference_builder(count: usize) -> LayerProfileBuilder {
        LayerProfileBuilder::new(0.5, 0.3, 0.0, ChordDistribution::Uniform.stations(count))
    }

    #[test]
    fn test_stations_have_exact_endpoints() {
        for dist in [ChordDistribution::Uniform, ChordDistribution::Cosine] {
            let s = dist.stations(17);
            assert_eq!(s.len(), 17);
            assert_eq!(s[0], 0.0);
            assert_eq!(s[16], 1.0);
            assert!(s.windows(2).all(|w| w[1] > w[0]));
        }
        let cosine = ChordDistribution::Cosine.stations(11);
        let uniform = ChordDistribution::Uniform.stations(11);
        assert!(cosine[1] < uniform[1]);
        assert!((cosine[5] - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_section_edges_coincide() {
        let params = reference_blade();
        let profile = SpanInterpolator::new(&params).profile(0.5).unwrap();
        let section = reference_builder(20).build(2, &profile).unwrap();

        assert_eq!(section.len(), 20);
        assert_eq!(section.upper[0], section.lower[0]);
        assert_eq!(section.upper[19], section.lower[19]);
        assert_eq!(section.upper[0], 0.0);
        assert!((section.upper[19] - 0.3).abs() < 1e-15);
        assert!((section.theta[19] - 0.5).abs() < 1e-15);
        assert!(section.thickness().skip(1).take(18).all(|t| t > 0.0));
    }

    #[test]
    fn test_camber_line_is_midpoint() {
        let params = reference_blade();
        let profile = SpanInterpolator::new(&params).profile(0.3).unwrap();
        let section = reference_builder(9).build(0, &profile).unwrap();
        for i in 0..9 {
            let mid = 0.5 * (section.upper[i] + section.lower[i]);
            assert!((mid - section.camber[i]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_zero_thickness_is_degenerate() {
        let params = reference_blade();
        let mut profile = SpanInterpolator::new(&params).profile(0.5).unwrap();
        profile.max_thickness = 0.0;
        let err = reference_builder(8).build(4, &profile).unwrap_err();
        assert_eq!(err.code(), BladeErrorCode::DegenerateSurface);
        match err {
            BladeError::DegenerateSurface {
                span_index,
                chord_index,
                ..
            } => {
                assert_eq!(span_index, 4);
                assert_eq!(chord_index, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_steep_thickness_keeps_skins_apart() {
        // With β = 8 the half thickness near the leading edge is far below
        // the spacing of f64 values around the camber line.
        let params = reference_blade();
        let mut profile = SpanInterpolator::new(&params).profile(0.5).unwrap();
        profile.thickness_steepness = 8.0;
        let section = reference_builder(300).build(2, &profile).unwrap();

        let tau = profile.thickness().unwrap().eval(section.stations[1]);
        let half = profile.max_thickness * tau;
        assert!(half > 0.0);
        assert!(half < 1e-20);
        assert!(section.thickness().skip(1).take(298).all(|t| t > 0.0));
        assert_eq!(section.upper[0], section.lower[0]);
    }

    #[test]
    fn test_nan_thickness_is_degenerate() {
        let params = reference_blade();
        let mut profile = SpanInterpolator::new(&params).profile(0.5).unwrap();
        profile.max_thickness = f64::NAN;
        let err = reference_builder(8).build(0, &profile).unwrap_err();
        assert_eq!(err.code(), BladeErrorCode::DegenerateSurface);
    }

    #[test]
    fn test_z0_shifts_section() {
        let params = reference_blade();
        let profile = SpanInterpolator::new(&params).profile(0.0).unwrap();
        let base = reference_builder(5).build(0, &profile).unwrap();
        let stations = ChordDistribution::Uniform.stations(5);
        let shifted = LayerProfileBuilder::new(0.5, 0.3, 1.0, stations)
            .build(0, &profile)
            .unwrap();
        for i in 0..5 {
            assert!((shifted.upper[i] - base.upper[i] - 1.0).abs() < 1e-12);
        }
    }
}
