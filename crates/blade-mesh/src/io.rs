//! Mesh file I/O for STL, OBJ, and legacy VTK.
//!
//! All three formats can be written. STL (binary or ASCII) can be read back;
//! `stl_io` welds identical vertices so the loaded mesh is indexed.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};
use crate::tracing_ext::log_io_operation;
use crate::validate::validate_mesh_data;
use crate::{Mesh, Vertex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Obj,
    Vtk,
}

impl MeshFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "stl" => Some(MeshFormat::Stl),
                "obj" => Some(MeshFormat::Obj),
                "vtk" => Some(MeshFormat::Vtk),
                _ => None,
            })
    }

    /// Lowercase file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "stl",
            MeshFormat::Obj => "obj",
            MeshFormat::Vtk => "vtk",
        }
    }
}

fn unsupported(path: &Path) -> MeshError {
    MeshError::UnsupportedFormat {
        extension: path.extension().and_then(|e| e.to_str()).map(String::from),
    }
}

/// Load a mesh from file. Only STL is readable.
pub fn load_mesh(path: &Path) -> MeshResult<Mesh> {
    match MeshFormat::from_path(path) {
        Some(MeshFormat::Stl) => load_stl(path),
        _ => Err(unsupported(path)),
    }
}

/// Load an STL file (binary or ASCII).
pub fn load_stl(path: &Path) -> MeshResult<Mesh> {
    let file = File::open(path).map_err(|e| MeshError::io_read(path, e))?;
    let mut reader = BufReader::new(file);

    let stl = stl_io::read_stl(&mut reader).map_err(|e| MeshError::ParseError {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    debug!(
        "STL contains {} vertices, {} triangles",
        stl.vertices.len(),
        stl.faces.len()
    );

    let mut mesh = Mesh::with_capacity(stl.vertices.len(), stl.faces.len());
    mesh.vertices.extend(
        stl.vertices
            .iter()
            .map(|v| Vertex::from_coords(v.0[0] as f64, v.0[1] as f64, v.0[2] as f64)),
    );
    mesh.faces.extend(stl.faces.iter().map(|face| {
        [
            face.vertices[0] as u32,
            face.vertices[1] as u32,
            face.vertices[2] as u32,
        ]
    }));

    if mesh.is_empty() {
        return Err(MeshError::empty_mesh(format!(
            "{} contains no triangles",
            path.display()
        )));
    }
    validate_mesh_data(&mesh)?;

    log_io_operation("load", path, "stl");
    Ok(mesh)
}

/// Save a mesh, choosing the format from the file extension.
pub fn save_mesh(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    match MeshFormat::from_path(path) {
        Some(MeshFormat::Stl) => save_stl(mesh, path),
        Some(MeshFormat::Obj) => save_obj(mesh, path),
        Some(MeshFormat::Vtk) => save_vtk(mesh, path),
        None => Err(unsupported(path)),
    }
}

/// Open `path` for writing, run `write`, and flush.
fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> MeshResult<()> {
    let file = File::create(path).map_err(|e| MeshError::io_write(path, e))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| MeshError::io_write(path, e))
}

/// Save as binary STL with per-face normals.
pub fn save_stl(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .map(|tri| {
            let n = tri.normal().unwrap_or_else(Vector3::zeros);
            let vertex =
                |p: Point3<f64>| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [vertex(tri.v0), vertex(tri.v1), vertex(tri.v2)],
            }
        })
        .collect();

    write_file(path, |writer| stl_io::write_stl(writer, triangles.iter()))?;

    info!("Saved {} triangles to {:?}", mesh.face_count(), path);
    log_io_operation("save", path, "stl");
    Ok(())
}

/// Save as Wavefront OBJ, keeping the vertex indexing.
pub fn save_obj(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    write_file(path, |w| {
        writeln!(w, "# Vertices: {}", mesh.vertex_count())?;
        writeln!(w, "# Faces: {}", mesh.face_count())?;

        for v in &mesh.vertices {
            writeln!(w, "v {:.9} {:.9} {:.9}", v.position.x, v.position.y, v.position.z)?;
        }

        let has_normals = mesh.vertices.iter().all(|v| v.normal.is_some());
        if has_normals {
            for n in mesh.vertices.iter().filter_map(|v| v.normal) {
                writeln!(w, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
            }
        }

        // OBJ indices are 1-based
        for &[a, b, c] in &mesh.faces {
            let (a, b, c) = (a + 1, b + 1, c + 1);
            if has_normals {
                writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?;
            } else {
                writeln!(w, "f {a} {b} {c}")?;
            }
        }
        Ok(())
    })?;

    log_io_operation("save", path, "obj");
    Ok(())
}

/// Save as legacy ASCII VTK polydata.
pub fn save_vtk(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    write_file(path, |w| {
        writeln!(w, "# vtk DataFile Version 3.0")?;
        writeln!(w, "blade mesh")?;
        writeln!(w, "ASCII")?;
        writeln!(w, "DATASET POLYDATA")?;
        writeln!(w, "POINTS {} double", mesh.vertex_count())?;
        for p in mesh.positions() {
            writeln!(w, "{:.9} {:.9} {:.9}", p.x, p.y, p.z)?;
        }
        writeln!(w, "POLYGONS {} {}", mesh.face_count(), mesh.face_count() * 4)?;
        for [a, b, c] in &mesh.faces {
            writeln!(w, "3 {a} {b} {c}")?;
        }
        Ok(())
    })?;

    log_io_operation("save", path, "vtk");
    Ok(())
}
