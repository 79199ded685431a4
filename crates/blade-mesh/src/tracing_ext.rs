//! Tracing helpers shared by the blade crates.
//!
//! Nothing here installs a subscriber; binaries do that. Useful targets:
//!
//! - `blade_mesh::timing`: operation start/finish with elapsed time
//! - `blade_mesh::mesh_state`: vertex/face counts and extents
//! - `blade_mesh::validation`: validation summaries
//! - `blade_mesh::io`: file reads and writes
//!
//! ```rust,ignore
//! // RUST_LOG=blade_mesh::timing=info,blade_geom=debug
//! let _timer = OperationTimer::new("sample_blade_surface");
//! ```

use std::path::Path;
use std::time::Instant;
use tracing::span::EnteredSpan;
use tracing::{debug, info, trace, warn};

use crate::{Mesh, MeshReport};

/// Enters an `info` span for the operation and logs the elapsed time on drop.
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    _span: EnteredSpan,
}

impl OperationTimer {
    /// Start timing an operation.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("blade_operation", operation = name).entered();
        debug!(target: "blade_mesh::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            _span: span,
        }
    }

    /// Start timing an operation on a mesh of known size.
    pub fn with_context(name: &'static str, face_count: usize, vertex_count: usize) -> Self {
        let span = tracing::info_span!(
            "blade_operation",
            operation = name,
            faces = face_count,
            vertices = vertex_count
        )
        .entered();
        debug!(
            target: "blade_mesh::timing",
            operation = name,
            faces = face_count,
            vertices = vertex_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            _span: span,
        }
    }

    /// Milliseconds since the timer started.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        info!(
            target: "blade_mesh::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", self.elapsed_ms()),
            "Operation completed"
        );
    }
}

/// Log mesh counts and extents at debug level.
pub fn log_mesh_stats(mesh: &Mesh, context: &str) {
    let (min_bounds, max_bounds) = mesh.bounds().unwrap_or_default();
    let dims = max_bounds - min_bounds;

    debug!(
        target: "blade_mesh::mesh_state",
        context = context,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        dimensions = format!("{:.4} x {:.4} x {:.4}", dims.x, dims.y, dims.z),
        "Mesh state"
    );
    trace!(
        target: "blade_mesh::mesh_state",
        context = context,
        min_z = min_bounds.z,
        max_z = max_bounds.z,
        "Axial extent"
    );
}

/// Log a validation report: info when it is a closed solid, warn otherwise.
pub fn log_validation_result(report: &MeshReport) {
    if report.is_closed_solid() {
        info!(
            target: "blade_mesh::validation",
            vertex_count = report.vertex_count,
            face_count = report.face_count,
            volume = report.volume,
            "Mesh is a closed outward-oriented solid"
        );
    } else {
        warn!(
            target: "blade_mesh::validation",
            is_watertight = report.is_watertight,
            is_manifold = report.is_manifold,
            boundary_edges = report.boundary_edge_count,
            non_manifold_edges = report.non_manifold_edge_count,
            inconsistent_edges = report.inconsistent_edge_count,
            degenerate_faces = report.degenerate_face_count,
            is_inside_out = report.is_inside_out,
            "Mesh validation found issues"
        );
    }
}

/// Log a completed file read or write.
pub fn log_io_operation(operation: &str, path: &Path, format: &str) {
    info!(
        target: "blade_mesh::io",
        operation = operation,
        path = %path.display(),
        format = format,
        "I/O operation completed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::make_unit_cube;
    use crate::validate_mesh;

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::with_context("test_operation", 12, 8);
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 10.0);
    }

    #[test]
    fn test_logging_helpers_accept_empty_mesh() {
        let mesh = Mesh::new();
        log_mesh_stats(&mesh, "test");
        log_validation_result(&validate_mesh(&mesh));
        log_validation_result(&validate_mesh(&make_unit_cube()));
    }
}
