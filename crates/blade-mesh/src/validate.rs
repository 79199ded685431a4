//! Mesh validation and reporting.

use nalgebra::Point3;
use tracing::{debug, warn};

use crate::{Mesh, Triangle};
use crate::adjacency::MeshAdjacency;
use crate::error::{MeshError, MeshResult, ValidationIssue};

/// Validation report for a mesh.
#[derive(Debug, Clone)]
pub struct MeshReport {
    /// Whether every edge is shared by exactly two faces.
    pub is_watertight: bool,

    /// Whether all edges have at most 2 adjacent faces.
    pub is_manifold: bool,

    /// Whether every interior edge is traversed in opposite directions by its faces.
    pub is_consistently_wound: bool,

    /// Number of boundary edges (edges with 1 adjacent face).
    pub boundary_edge_count: usize,

    /// Number of non-manifold edges (edges with >2 adjacent faces).
    pub non_manifold_edge_count: usize,

    /// Number of interior edges with matching traversal direction.
    pub inconsistent_edge_count: usize,

    /// Number of collapsed faces (coincident or collinear corners).
    pub degenerate_face_count: usize,

    /// Total vertex count.
    pub vertex_count: usize,

    /// Total face count.
    pub face_count: usize,

    /// Bounding box as (min_corner, max_corner).
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,

    /// Signed volume of the mesh (positive = outward normals, negative = inside-out).
    /// Only meaningful for closed (watertight) meshes.
    pub signed_volume: f64,

    /// Absolute volume of the mesh.
    pub volume: f64,

    /// Total surface area of the mesh.
    pub surface_area: f64,

    /// Mean face edge length.
    pub mean_edge_length: f64,

    /// Whether the mesh appears to be inside-out (negative signed volume).
    pub is_inside_out: bool,
}

impl MeshReport {
    /// Check if mesh passes basic validity checks.
    pub fn is_valid(&self) -> bool {
        self.vertex_count > 0 && self.face_count > 0 && self.degenerate_face_count == 0
    }

    /// A closed, consistently oriented solid with outward normals.
    pub fn is_closed_solid(&self) -> bool {
        self.is_valid()
            && self.is_watertight
            && self.is_manifold
            && self.is_consistently_wound
            && self.signed_volume > 0.0
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;

        if let Some((min, max)) = &self.bounds {
            writeln!(
                f,
                "  Bounds: [{:.4}, {:.4}, {:.4}] to [{:.4}, {:.4}, {:.4}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }

        writeln!(f, "  Surface Area: {:.6}", self.surface_area)?;
        writeln!(
            f,
            "  Volume: {:.6e} (signed: {:.6e})",
            self.volume, self.signed_volume
        )?;
        writeln!(f, "  Mean edge length: {:.6}", self.mean_edge_length)?;

        writeln!(
            f,
            "  Watertight: {} (boundary edges: {})",
            if self.is_watertight { "yes" } else { "NO" },
            self.boundary_edge_count
        )?;

        writeln!(
            f,
            "  Manifold: {} (non-manifold edges: {})",
            if self.is_manifold { "yes" } else { "NO" },
            self.non_manifold_edge_count
        )?;

        writeln!(
            f,
            "  Winding: {} (inconsistent edges: {})",
            if self.is_consistently_wound {
                "consistent"
            } else {
                "MIXED"
            },
            self.inconsistent_edge_count
        )?;

        writeln!(f, "  Degenerate faces: {}", self.degenerate_face_count)?;

        writeln!(
            f,
            "  Orientation: {}",
            if self.is_inside_out {
                "INSIDE-OUT"
            } else {
                "outward"
            }
        )?;

        Ok(())
    }
}

/// Count collapsed faces: repeated indices, coincident corners or collinear corners.
fn count_degenerate_faces(mesh: &Mesh) -> usize {
    mesh.faces
        .iter()
        .zip(mesh.triangles())
        .filter(|(face, tri)| is_degenerate_face(face, tri))
        .count()
}

fn is_degenerate_face(face: &[u32; 3], tri: &Triangle) -> bool {
    face[0] == face[1] || face[1] == face[2] || face[2] == face[0] || tri.is_degenerate()
}

/// Validate a mesh and return a report.
pub fn validate_mesh(mesh: &Mesh) -> MeshReport {
    let adjacency = MeshAdjacency::build(&mesh.faces);

    let boundary_edge_count = adjacency.boundary_edge_count();
    let non_manifold_edge_count = adjacency.non_manifold_edge_count();
    let inconsistent_edge_count = adjacency.inconsistent_edge_count();

    let signed_volume = mesh.signed_volume();
    let mean_edge_length = mesh.mean_edge_length();

    let report = MeshReport {
        is_watertight: !mesh.faces.is_empty() && adjacency.is_watertight(),
        is_manifold: non_manifold_edge_count == 0,
        is_consistently_wound: inconsistent_edge_count == 0,
        boundary_edge_count,
        non_manifold_edge_count,
        inconsistent_edge_count,
        degenerate_face_count: count_degenerate_faces(mesh),
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        bounds: mesh.bounds(),
        signed_volume,
        volume: signed_volume.abs(),
        surface_area: mesh.surface_area(),
        mean_edge_length,
        is_inside_out: signed_volume < 0.0,
    };

    if !report.is_manifold {
        warn!(
            "Mesh is not manifold: {} non-manifold edges",
            non_manifold_edge_count
        );
    }

    if !report.is_consistently_wound {
        warn!(
            "Mesh has mixed winding: {} edges traversed in the same direction",
            inconsistent_edge_count
        );
    }

    debug!("{}", report);

    report
}

/// Collect individual issues, up to `max_issues`.
pub fn collect_issues(mesh: &Mesh, max_issues: usize) -> Vec<ValidationIssue> {
    let adjacency = MeshAdjacency::build(&mesh.faces);

    let degenerate = mesh
        .faces
        .iter()
        .zip(mesh.triangles())
        .enumerate()
        .filter(|(_, (face, tri))| is_degenerate_face(face, tri))
        .map(|(face_index, (_, tri))| ValidationIssue::DegenerateFace {
            face_index,
            area: tri.area(),
        });

    let boundary = adjacency
        .boundary_edges()
        .map(|(vertex_a, vertex_b)| ValidationIssue::BoundaryEdge { vertex_a, vertex_b });

    let non_manifold = adjacency.non_manifold_edges().map(|(vertex_a, vertex_b)| {
        ValidationIssue::NonManifoldEdge {
            vertex_a,
            vertex_b,
            face_count: adjacency
                .edge_to_faces
                .get(&(vertex_a, vertex_b))
                .map_or(0, Vec::len),
        }
    });

    let winding = adjacency
        .inconsistent_edges()
        .map(|(vertex_a, vertex_b)| ValidationIssue::InconsistentWinding { vertex_a, vertex_b });

    degenerate
        .chain(non_manifold)
        .chain(winding)
        .chain(boundary)
        .take(max_issues)
        .collect()
}

/// Reject meshes with invalid indices or non-finite coordinates.
pub fn validate_mesh_data(mesh: &Mesh) -> MeshResult<()> {
    let vertex_count = mesh.vertices.len();

    for (vertex_idx, vertex) in mesh.vertices.iter().enumerate() {
        let coords = [
            ("x", vertex.position.x),
            ("y", vertex.position.y),
            ("z", vertex.position.z),
        ];
        for (coord_name, value) in coords {
            if !value.is_finite() {
                return Err(MeshError::InvalidCoordinate {
                    vertex_index: vertex_idx,
                    coordinate: coord_name,
                    value,
                });
            }
        }
    }

    for (face_idx, face) in mesh.faces.iter().enumerate() {
        for &vertex_idx in face {
            if vertex_idx as usize >= vertex_count {
                return Err(MeshError::InvalidVertexIndex {
                    face_index: face_idx,
                    vertex_index: vertex_idx,
                    vertex_count,
                });
            }
        }
    }

    Ok(())
}

/// Reject meshes with a zero mean edge length or any collapsed face.
///
/// Thin faces with a small but non-zero cross product pass; there is no
/// area threshold relative to the mesh scale.
pub fn check_non_degenerate(mesh: &Mesh) -> MeshResult<()> {
    if mesh.is_empty() {
        return Err(MeshError::empty_mesh("mesh has no vertices or faces"));
    }

    let mean_edge_length = mesh.mean_edge_length();
    if mean_edge_length.is_nan() || mean_edge_length <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "mean edge length is {}",
            mean_edge_length
        )));
    }

    if let Some((face_index, (_, tri))) = mesh
        .faces
        .iter()
        .zip(mesh.triangles())
        .enumerate()
        .find(|(_, (face, tri))| is_degenerate_face(face, tri))
    {
        return Err(MeshError::degenerate_face(face_index, tri.area()));
    }

    Ok(())
}
