//! Fluent builder API for blade generation.
//!
//! [`BladeBuilder`] chains sampling and triangulation settings before running
//! the sample → triangulate pipeline in one call.
//!
//! # Example
//!
//! ```no_run
//! use blade_geom::{BladeBuilder, BladeParameters, ChordDistribution};
//!
//! let params = BladeParameters::load("rotor.json").unwrap();
//!
//! let result = BladeBuilder::new(&params)
//!     .span_samples(17)
//!     .chord_samples(128)
//!     .chord_distribution(ChordDistribution::Cosine)
//!     .build()
//!     .unwrap();
//!
//! result.solid.mesh.save("rotor_blade.stl").unwrap();
//! ```

use crate::error::BladeResult;
use crate::layer::ChordDistribution;
use crate::params::BladeParameters;
use crate::sampler::{BladeSurfaceGrid, SamplingConfig, sample_blade_surface_with};
use crate::solid::{BladeSolid, build_blade_solid};

/// Result from [`BladeBuilder`]: the sampled grid and its triangulation.
#[derive(Debug, Clone)]
pub struct BladeBuildResult {
    /// The sampled surface the mesh was built from.
    pub grid: BladeSurfaceGrid,
    /// Triangulated blade.
    pub solid: BladeSolid,
}

/// Fluent builder for one blade.
///
/// Defaults: [`SamplingConfig::default`] and a closed solid.
///
/// ```no_run
/// use blade_geom::{BladeBuilder, BladeParameters};
///
/// let params = BladeParameters::load("vane.toml").unwrap();
///
/// // Open shell with a coarse grid
/// let result = BladeBuilder::new(&params)
///     .span_samples(5)
///     .chord_samples(24)
///     .shell()
///     .build()
///     .unwrap();
/// assert!(!result.solid.closed);
/// ```
#[derive(Debug, Clone)]
pub struct BladeBuilder<'a> {
    params: &'a BladeParameters,
    sampling: SamplingConfig,
    as_solid: bool,
}

impl<'a> BladeBuilder<'a> {
    /// Create a builder for `params`.
    pub fn new(params: &'a BladeParameters) -> Self {
        Self {
            params,
            sampling: SamplingConfig::default(),
            as_solid: true,
        }
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// Number of span rows, at least one per defining layer.
    pub fn span_samples(mut self, count: usize) -> Self {
        self.sampling.span_samples = count;
        self
    }

    /// Number of chord stations per row, at least 3.
    pub fn chord_samples(mut self, count: usize) -> Self {
        self.sampling.chord_samples = count;
        self
    }

    pub fn chord_distribution(mut self, distribution: ChordDistribution) -> Self {
        self.sampling.chord_distribution = distribution;
        self
    }

    /// Replace every sampling setting at once.
    pub fn sampling(mut self, config: SamplingConfig) -> Self {
        self.sampling = config;
        self
    }

    // =========================================================================
    // Triangulation
    // =========================================================================

    /// Close the blade with root and tip caps (the default).
    pub fn solid(mut self) -> Self {
        self.as_solid = true;
        self
    }

    /// Leave root and tip open.
    pub fn shell(mut self) -> Self {
        self.as_solid = false;
        self
    }

    pub fn as_solid(mut self, enable: bool) -> Self {
        self.as_solid = enable;
        self
    }

    // =========================================================================
    // Presets
    // =========================================================================

    /// Coarse grid for previews: 5 rows, 24 uniform stations.
    pub fn preview(mut self) -> Self {
        self.sampling = SamplingConfig::new(5, 24);
        self
    }

    /// Dense grid for export: 33 rows, 300 cosine-spaced stations.
    pub fn high_quality(mut self) -> Self {
        self.sampling =
            SamplingConfig::new(33, 300).with_distribution(ChordDistribution::Cosine);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// The sampling configuration the builder would use.
    pub fn config(&self) -> &SamplingConfig {
        &self.sampling
    }

    /// Sample only.
    pub fn build_grid(&self) -> BladeResult<BladeSurfaceGrid> {
        sample_blade_surface_with(self.params, &self.sampling)
    }

    /// Sample and triangulate.
    pub fn build(self) -> BladeResult<BladeBuildResult> {
        let grid = self.build_grid()?;
        let solid = build_blade_solid(&grid, self.as_solid)?;
        Ok(BladeBuildResult { grid, solid })
    }
}
