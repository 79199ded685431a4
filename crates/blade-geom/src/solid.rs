//! Triangulation of a sampled blade into a closed solid or an open shell.
//!
//! Vertex layout: the full upper skin (S × K points) followed by the interior
//! lower points (S × (K − 2)). Leading and trailing edge points belong to the
//! upper skin and are shared by the lower skin, so the two skins meet along
//! both edges without duplicate vertices.
//!
//! The root (span 0) and tip (span 1) rows are closed with caps that fan
//! between the two skins. Orientation is taken from the capped solid; a shell
//! keeps that orientation and only drops the caps.

use blade_mesh::{
    Mesh, MeshError, MeshReport, OperationTimer, check_non_degenerate, log_validation_result,
    validate_mesh,
};
use tracing::{info, warn};

use crate::error::{BladeError, BladeResult};
use crate::sampler::BladeSurfaceGrid;

/// Triangulated blade plus its validation report.
#[derive(Debug, Clone)]
pub struct BladeSolid {
    /// The blade mesh, outward oriented.
    pub mesh: Mesh,
    /// Whether the root and tip caps are present.
    pub closed: bool,
    /// Whether the raw winding had to be reversed to face outward.
    pub flipped: bool,
    /// Topology and geometry report of `mesh`.
    pub report: MeshReport,
}

impl BladeSolid {
    /// Signed volume of the capped blade.
    ///
    /// Positive for a correctly oriented solid; for a shell this is the
    /// volume of the surface as if its caps were present.
    pub fn signed_volume(&self) -> f64 {
        self.report.signed_volume
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }
}

/// Index arithmetic for the shared-edge vertex layout.
#[derive(Debug, Clone, Copy)]
struct GridIndex {
    spans: usize,
    chords: usize,
}

impl GridIndex {
    fn upper(&self, i: usize, j: usize) -> u32 {
        (i * self.chords + j) as u32
    }

    fn lower(&self, i: usize, j: usize) -> u32 {
        if j == 0 || j + 1 == self.chords {
            self.upper(i, j)
        } else {
            (self.spans * self.chords + i * (self.chords - 2) + (j - 1)) as u32
        }
    }

    fn vertex_count(&self) -> usize {
        self.spans * self.chords + self.spans * (self.chords - 2)
    }
}

/// Upper and lower skin triangles.
fn skin_faces(index: GridIndex) -> Vec<[u32; 3]> {
    let mut faces = Vec::with_capacity(4 * (index.spans - 1) * (index.chords - 1));
    for i in 0..index.spans - 1 {
        for j in 0..index.chords - 1 {
            let (a, b, c, d) = (
                index.upper(i, j),
                index.upper(i, j + 1),
                index.upper(i + 1, j + 1),
                index.upper(i + 1, j),
            );
            faces.push([a, b, c]);
            faces.push([a, c, d]);

            let (a, b, c, d) = (
                index.lower(i, j),
                index.lower(i, j + 1),
                index.lower(i + 1, j + 1),
                index.lower(i + 1, j),
            );
            faces.push([a, c, b]);
            faces.push([a, d, c]);
        }
    }
    faces
}

/// Cap triangles closing one span row between the two skins.
///
/// `reversed` selects the tip winding, opposite to the root.
fn cap_faces(index: GridIndex, row: usize, reversed: bool) -> Vec<[u32; 3]> {
    let k = index.chords;
    let mut faces = Vec::with_capacity(2 * (k - 2));
    for j in 0..k - 1 {
        let (u0, u1) = (index.upper(row, j), index.upper(row, j + 1));
        let (l0, l1) = (index.lower(row, j), index.lower(row, j + 1));
        // At the edges one triangle of the strip collapses onto the shared point.
        if j > 0 {
            faces.push([u1, u0, l0]);
        }
        if j + 2 < k {
            faces.push([u1, l0, l1]);
        }
    }
    if reversed {
        for face in &mut faces {
            face.swap(1, 2);
        }
    }
    faces
}

/// Triangulate a sampled blade.
///
/// With `as_solid` the root and tip caps close the blade into a watertight
/// manifold with positive signed volume. Without it the two skins are
/// returned as an open shell with the same orientation.
///
/// Fails with `DegenerateMesh` when any face is collapsed.
pub fn build_blade_solid(grid: &BladeSurfaceGrid, as_solid: bool) -> BladeResult<BladeSolid> {
    let (spans, chords) = (grid.span_count(), grid.chord_count());
    if spans < 2 || chords < 3 || !grid.is_rectangular() {
        return Err(BladeError::DegenerateMesh {
            face_index: None,
            details: format!("cannot triangulate a {}x{} sample grid", spans, chords),
        });
    }

    let index = GridIndex { spans, chords };
    let _timer = OperationTimer::with_context(
        "build_blade_solid",
        4 * (spans - 1) * (chords - 1),
        index.vertex_count(),
    );

    let lower_interior =
        (0..spans).flat_map(|i| grid.lower_row(i)[1..chords - 1].iter().copied());
    let positions: Vec<_> = grid.upper_points().iter().copied().chain(lower_interior).collect();
    debug_assert_eq!(positions.len(), index.vertex_count());

    let skins = skin_faces(index);
    let mut caps = cap_faces(index, 0, false);
    caps.extend(cap_faces(index, spans - 1, true));

    let mut solid = Mesh::from_parts(positions, skins);
    let skin_face_count = solid.face_count();
    solid.faces.extend(caps);

    let flipped = solid.orient_outward();

    check_non_degenerate(&solid).map_err(|err| match err {
        MeshError::DegenerateMesh {
            face_index,
            details,
        } => BladeError::DegenerateMesh {
            face_index,
            details,
        },
        other => BladeError::Mesh(other),
    })?;

    let solid_report = validate_mesh(&solid);
    if !solid_report.is_closed_solid() {
        warn!(%solid_report, "Capped blade is not a closed solid");
        return Err(BladeError::DegenerateMesh {
            face_index: None,
            details: format!(
                "capped blade is not a closed outward solid ({} boundary, {} non-manifold, {} inconsistent edges)",
                solid_report.boundary_edge_count,
                solid_report.non_manifold_edge_count,
                solid_report.inconsistent_edge_count
            ),
        });
    }

    let (mesh, report) = if as_solid {
        (solid, solid_report)
    } else {
        let mut shell = solid;
        shell.faces.truncate(skin_face_count);
        let mut report = validate_mesh(&shell);
        report.signed_volume = solid_report.signed_volume;
        report.volume = solid_report.volume;
        report.is_inside_out = false;
        (shell, report)
    };

    log_validation_result(&report);
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        closed = as_solid,
        flipped,
        volume = report.volume,
        "Triangulated blade"
    );

    Ok(BladeSolid {
        mesh,
        closed: as_solid,
        flipped,
        report,
    })
}
