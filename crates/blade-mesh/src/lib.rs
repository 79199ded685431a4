//! Triangle mesh primitives for the blade geometry crates.
//!
//! This crate holds the mesh-level pieces that blade solids and pump
//! assemblies are built from:
//!
//! - **Types**: indexed [`Mesh`] with signed volume, rigid transforms, concatenation
//! - **Validation**: watertightness, manifoldness, winding consistency, degenerate faces
//! - **Orientation**: winding repair and outward orientation
//! - **Assemblies**: named parts and groups with per-part placement
//! - **File I/O**: STL, OBJ and legacy VTK export; STL import
//!
//! # Units and Coordinates
//!
//! The library is unit-agnostic. Blade geometry is conventionally in meters.
//! The frame is right-handed with Z as the pump axis.
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside** the mesh,
//! so a closed solid has positive signed volume.
//!
//! # Quick Start
//!
//! ```no_run
//! use blade_mesh::Mesh;
//!
//! let mesh = Mesh::load("blade.stl").unwrap();
//! let report = mesh.validate();
//! println!("{}", report);
//!
//! if report.is_closed_solid() {
//!     mesh.save("blade.vtk").unwrap();
//! }
//! ```

mod error;
pub mod tracing_ext;
mod types;

pub mod adjacency;
pub mod assembly;
pub mod io;
pub mod validate;
pub mod winding;

pub use error::{
    ErrorCode, IssueSeverity, MeshError, MeshLocation, MeshResult, RecoverySuggestion,
    ValidationIssue,
};
pub use types::{Mesh, Triangle, Vertex};

pub use adjacency::MeshAdjacency;
pub use assembly::{Assembly, Part, PartId};
pub use io::{MeshFormat, load_mesh, load_stl, save_mesh, save_obj, save_stl, save_vtk};
pub use tracing_ext::{OperationTimer, log_io_operation, log_mesh_stats, log_validation_result};
pub use validate::{
    MeshReport, check_non_degenerate, collect_issues, validate_mesh, validate_mesh_data,
};
pub use winding::{WindingFix, fix_winding_order, orient_outward};

// Convenience methods on Mesh
impl Mesh {
    /// Load a mesh from a file, auto-detecting format from extension.
    pub fn load(path: impl AsRef<std::path::Path>) -> MeshResult<Self> {
        io::load_mesh(path.as_ref())
    }

    /// Save the mesh to a file, auto-detecting format from extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> MeshResult<()> {
        io::save_mesh(self, path.as_ref())
    }

    /// Validate the mesh and return a report of any issues.
    pub fn validate(&self) -> MeshReport {
        validate::validate_mesh(self)
    }

    /// Make face winding consistent within each connected component.
    pub fn fix_winding(&mut self) -> WindingFix {
        winding::fix_winding_order(self)
    }

    /// Flip all faces if the mesh is inside-out. Returns whether it flipped.
    pub fn orient_outward(&mut self) -> bool {
        winding::orient_outward(self)
    }
}
