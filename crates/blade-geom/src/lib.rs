//! Parametric pump blade generation for CFD preprocessing.
//!
//! A blade is described by a handful of global scalars and five spanwise
//! layers of closed-form shape parameters. This crate turns that record into
//! sampled surfaces, watertight blade solids and complete pump assemblies.
//!
//! # Features
//!
//! - **Shape functions**: Beta-form camber with optional sharpness, three-piece
//!   thickness with optional taper, both with analytic derivatives
//! - **Span interpolation**: piecewise-linear, never extrapolating
//! - **Surface sampling**: rectangular span × chord grids with uniform or
//!   cosine chord spacing
//! - **Solidization**: capped, outward-oriented, validated blade meshes
//! - **Pump assembly**: blade rows on hub sections with inlet/outlet diffusers
//!
//! # Quick Start with BladeBuilder
//!
//! ```no_run
//! use blade_geom::{BladeBuilder, BladeParameters};
//!
//! let params = BladeParameters::load("rotor.json").unwrap();
//!
//! let result = BladeBuilder::new(&params)
//!     .span_samples(9)
//!     .chord_samples(64)
//!     .build()
//!     .unwrap();
//!
//! println!("{}", result.solid.report);
//! result.solid.mesh.save("rotor_blade.stl").unwrap();
//! ```
//!
//! # Low-Level API
//!
//! ```no_run
//! use blade_geom::{BladeParameters, SpanInterpolator, build_blade_solid, sample_blade_surface};
//!
//! let params = BladeParameters::load("rotor.toml").unwrap();
//!
//! // Resolved layer at mid span
//! let profile = SpanInterpolator::new(&params).profile(0.5).unwrap();
//! println!("camber at mid span: {}", profile.max_camber);
//!
//! let grid = sample_blade_surface(&params, 5, 20).unwrap();
//! let solid = build_blade_solid(&grid, true).unwrap();
//! assert!(solid.signed_volume() > 0.0);
//! ```
//!
//! # Pump Assembly
//!
//! ```no_run
//! use std::path::Path;
//! use blade_geom::{BladeParameters, PumpLayout, SamplingConfig, assemble_pump};
//! use blade_mesh::MeshFormat;
//!
//! let rotor = BladeParameters::load("rotor.json").unwrap();
//! let vane = BladeParameters::load("vane.json").unwrap();
//!
//! let pump = assemble_pump(
//!     &rotor,
//!     Some(&vane),
//!     &SamplingConfig::default(),
//!     &PumpLayout::default(),
//! )
//! .unwrap();
//! pump.export(Path::new("out"), MeshFormat::Stl).unwrap();
//! ```

mod builder;
mod error;

pub mod diffuser;
pub mod layer;
pub mod params;
pub mod primitives;
pub mod pump;
pub mod sampler;
pub mod shape;
pub mod solid;
pub mod span;

pub use error::{BladeError, BladeErrorCode, BladeRecoverySuggestion, BladeResult};

// Builder API (recommended)
pub use builder::{BladeBuildResult, BladeBuilder};

// Inputs
pub use params::{BladeParameters, BladeRecord, LAYER_COUNT, LayerParameters, RecordFormat};
pub use shape::{CamberShape, ThicknessShape};

// Sampling
pub use layer::{ChordDistribution, LayerProfileBuilder, LayerSection};
pub use sampler::{
    BladeSurfaceGrid, SamplingConfig, sample_blade_surface, sample_blade_surface_with,
    span_positions,
};
pub use span::{LayerProfile, SpanInterpolator};

// Solids
pub use solid::{BladeSolid, build_blade_solid};

// Assembly
pub use diffuser::{DiffuserPosition, DiffuserResolution, DiffuserShape, create_diffuser};
pub use primitives::{cylinder, revolve_profile};
pub use pump::{BladeRow, PumpAssembly, PumpLayout, assemble_blades_on_hub, assemble_pump};
