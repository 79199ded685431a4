//! Core mesh data types.

use nalgebra::{Isometry3, Point3, Rotation3, Vector3};

/// A vertex in the mesh with an optional computed normal.
///
/// The library is unit-agnostic; blade geometry is usually in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Unit normal vector, computed from adjacent faces.
    pub normal: Option<Vector3<f64>>,
}

impl Vertex {
    /// Create a new vertex with only position set.
    #[inline]
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// A triangle mesh with indexed vertices and faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is [v0, v1, v2] with counter-clockwise winding seen from outside.
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Build a mesh from bare positions and faces.
    pub fn from_parts(
        positions: impl IntoIterator<Item = Point3<f64>>,
        faces: Vec<[u32; 3]>,
    ) -> Self {
        Self {
            vertices: positions.into_iter().map(Vertex::new).collect(),
            faces,
        }
    }

    /// Number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces (triangles) in the mesh.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if mesh is empty (no vertices or faces).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Iterate over vertex positions in index order.
    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> + '_ {
        self.vertices.iter().map(|v| &v.position)
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut min = self.vertices[0].position;
        let mut max = self.vertices[0].position;

        for vertex in &self.vertices[1..] {
            let p = &vertex.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Iterate over triangles, yielding Triangle structs with actual vertex data.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|&[i0, i1, i2]| Triangle {
            v0: self.vertices[i0 as usize].position,
            v1: self.vertices[i1 as usize].position,
            v2: self.vertices[i2 as usize].position,
        })
    }

    /// Translate mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Rotate mesh about the +Z axis through the origin.
    pub fn rotate_z(&mut self, angle: f64) {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), angle);
        for vertex in &mut self.vertices {
            vertex.position = rotation * vertex.position;
            if let Some(ref mut normal) = vertex.normal {
                *normal = rotation * *normal;
            }
        }
    }

    /// Apply a rigid transform to every vertex (and normal).
    pub fn transform(&mut self, isometry: &Isometry3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position = isometry * vertex.position;
            if let Some(ref mut normal) = vertex.normal {
                *normal = isometry.rotation * *normal;
            }
        }
    }

    /// Append another mesh, offsetting its face indices.
    ///
    /// Vertices are not welded; the result is a plain concatenation.
    pub fn append(&mut self, other: &Mesh) {
        let vertex_offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices.iter().cloned());
        self.faces.extend(other.faces.iter().map(|face| {
            [
                face[0] + vertex_offset,
                face[1] + vertex_offset,
                face[2] + vertex_offset,
            ]
        }));
    }

    /// Concatenate several meshes into one.
    pub fn concatenate<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Mesh {
        let mut result = Mesh::new();
        for mesh in meshes {
            result.append(mesh);
        }
        result
    }

    /// Reverse the winding of every face.
    pub fn flip_faces(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
        for vertex in &mut self.vertices {
            if let Some(ref mut normal) = vertex.normal {
                *normal = -*normal;
            }
        }
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Uses the divergence theorem: the signed volume is the sum of signed tetrahedra
    /// volumes formed by each face and the origin. For a closed mesh with outward-facing
    /// normals (CCW winding when viewed from outside), this returns a positive value.
    ///
    /// # Returns
    /// - Positive value: normals point outward (correct orientation)
    /// - Negative value: normals point inward (inside-out mesh)
    /// - Near-zero: mesh is not closed or has inconsistent winding
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;

        for &[i0, i1, i2] in &self.faces {
            let v0 = &self.vertices[i0 as usize].position;
            let v1 = &self.vertices[i1 as usize].position;
            let v2 = &self.vertices[i2 as usize].position;

            // Scalar triple product v0 · (v1 × v2)
            volume += v0.coords.dot(&v1.coords.cross(&v2.coords));
        }

        volume / 6.0
    }

    /// Compute the absolute volume of the mesh.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Check if the mesh appears to be inside-out (negative signed volume).
    ///
    /// Only meaningful for closed meshes.
    #[inline]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume() < 0.0
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }

    /// Mean length of all face edges (shared edges are counted once per face).
    ///
    /// Returns 0.0 for a mesh without faces.
    pub fn mean_edge_length(&self) -> f64 {
        if self.faces.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .triangles()
            .map(|tri| tri.edge_lengths().iter().sum::<f64>())
            .sum();
        total / (self.faces.len() * 3) as f64
    }

    /// Recompute per-vertex normals as the area-weighted average of face normals.
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vector3::zeros(); self.vertices.len()];
        for (face, tri) in self.faces.iter().zip(self.triangles()) {
            let n = tri.normal_unnormalized();
            for &idx in face {
                accum[idx as usize] += n;
            }
        }
        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = n.try_normalize(f64::EPSILON);
        }
    }
}

/// A triangle with concrete vertex positions.
///
/// Winding is counter-clockwise when viewed from the front (normal points toward viewer).
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Compute the (unnormalized) face normal via cross product.
    #[inline]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    /// Returns None when the cross product is shorter than `f64::EPSILON`.
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len_sq = n.norm_squared();
        if len_sq > f64::EPSILON * f64::EPSILON {
            Some(n / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Compute the area of the triangle.
    #[inline]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Compute the lengths of the three edges.
    /// Returns [len01, len12, len20] where lenXY is the distance from vX to vY.
    #[inline]
    pub fn edge_lengths(&self) -> [f64; 3] {
        [
            (self.v1 - self.v0).norm(),
            (self.v2 - self.v1).norm(),
            (self.v0 - self.v2).norm(),
        ]
    }

    /// Check if the triangle is collapsed.
    ///
    /// A triangle is degenerate when a corner is non-finite, two corners
    /// coincide, or its corners are collinear. Collinearity is tested with the
    /// cross product of the two edges meeting opposite the longest edge, which
    /// stays exact for thin slivers. Small but non-zero areas are not degenerate.
    pub fn is_degenerate(&self) -> bool {
        let corners = [self.v0, self.v1, self.v2];
        if corners
            .iter()
            .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return true;
        }
        if self.v0 == self.v1 || self.v1 == self.v2 || self.v2 == self.v0 {
            return true;
        }

        // Edge i runs from corner i to corner i + 1; the longest one is
        // opposite corner i + 2.
        let lengths = self.edge_lengths();
        let longest = (0..3)
            .max_by(|&a, &b| lengths[a].total_cmp(&lengths[b]))
            .unwrap_or(0);
        let apex = corners[(longest + 2) % 3];
        let e1 = corners[longest] - apex;
        let e2 = corners[(longest + 1) % 3] - apex;
        let cross = e1.cross(&e2);
        !cross.iter().all(|c| c.is_finite()) || cross.iter().all(|&c| c == 0.0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    /// Unit cube with outward-facing normals (CCW winding from outside).
    pub(crate) fn make_unit_cube() -> Mesh {
        let mut mesh = Mesh::new();

        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0)); // 0
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0)); // 1
        mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 0.0)); // 2
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0)); // 3
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 1.0)); // 4
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 1.0)); // 5
        mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 1.0)); // 6
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 1.0)); // 7

        // Bottom
        mesh.faces.push([0, 2, 1]);
        mesh.faces.push([0, 3, 2]);
        // Top
        mesh.faces.push([4, 5, 6]);
        mesh.faces.push([4, 6, 7]);
        // Front (y=0)
        mesh.faces.push([0, 1, 5]);
        mesh.faces.push([0, 5, 4]);
        // Back (y=1)
        mesh.faces.push([3, 7, 6]);
        mesh.faces.push([3, 6, 2]);
        // Left (x=0)
        mesh.faces.push([0, 4, 7]);
        mesh.faces.push([0, 7, 3]);
        // Right (x=1)
        mesh.faces.push([1, 2, 6]);
        mesh.faces.push([1, 6, 5]);

        mesh
    }

    #[test]
    fn test_triangle_normal() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );

        let normal = tri.normal().expect("non-degenerate triangle");
        assert!(approx_eq(normal.z, 1.0));
        assert!(approx_eq(tri.area(), 0.5));
    }

    #[test]
    fn test_degenerate_triangle() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(tri.normal().is_none());
        assert!(tri.is_degenerate());
    }

    #[test]
    fn test_coincident_corners_are_degenerate() {
        let p = Point3::new(0.3, -0.2, 1.0);
        let tri = Triangle::new(p, Point3::new(1.0, 0.0, 0.0), p);
        assert!(tri.is_degenerate());

        let tri = Triangle::new(p, Point3::new(f64::NAN, 0.0, 0.0), Point3::origin());
        assert!(tri.is_degenerate());
    }

    #[test]
    fn test_thin_sliver_is_not_degenerate() {
        // Two corners one ulp apart in z, as at a blade edge where the
        // skins nearly touch.
        let z: f64 = -0.0029977;
        let upper = Point3::new(0.1, 0.02, z.next_up());
        let lower = Point3::new(0.1, 0.02, z);
        let edge = Point3::new(0.1001, 0.0199, 0.05);
        let area = Triangle::new(upper, edge, lower).area();
        assert!(area > 0.0 && area < 1e-20);
        for tri in [
            Triangle::new(upper, edge, lower),
            Triangle::new(edge, lower, upper),
            Triangle::new(lower, upper, edge),
        ] {
            assert!(!tri.is_degenerate());
        }
    }

    #[test]
    fn test_signed_volume_unit_cube() {
        let mesh = make_unit_cube();
        assert!(approx_eq(mesh.signed_volume(), 1.0));
        assert!(!mesh.is_inside_out());
        assert!(approx_eq(mesh.surface_area(), 6.0));
    }

    #[test]
    fn test_flip_faces_inverts_volume() {
        let mut mesh = make_unit_cube();
        mesh.flip_faces();
        assert!(approx_eq(mesh.signed_volume(), -1.0));
        assert!(mesh.is_inside_out());
    }

    #[test]
    fn test_signed_volume_translated_and_rotated() {
        let mut mesh = make_unit_cube();
        mesh.translate(Vector3::new(10.0, 20.0, 30.0));
        mesh.rotate_z(FRAC_PI_2);
        assert!(approx_eq(mesh.signed_volume(), 1.0));
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 2.0));
        mesh.rotate_z(FRAC_PI_2);
        let p = mesh.vertices[0].position;
        assert!(approx_eq(p.x, 0.0));
        assert!(approx_eq(p.y, 1.0));
        assert!(approx_eq(p.z, 2.0));
    }

    #[test]
    fn test_append_offsets_indices() {
        let cube = make_unit_cube();
        let merged = Mesh::concatenate([&cube, &cube]);
        assert_eq!(merged.vertex_count(), 16);
        assert_eq!(merged.face_count(), 24);
        assert_eq!(merged.faces[12], [8, 10, 9]);
        assert!(approx_eq(merged.signed_volume(), 2.0));
    }

    #[test]
    fn test_mean_edge_length() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(3.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 4.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        assert!(approx_eq(mesh.mean_edge_length(), 4.0));
        assert!(approx_eq(Mesh::new().mean_edge_length(), 0.0));
    }

    #[test]
    fn test_mesh_bounds() {
        let mesh = make_unit_cube();
        let (min, max) = mesh.bounds().expect("non-empty mesh");
        assert!(approx_eq(min.x, 0.0));
        assert!(approx_eq(max.z, 1.0));
        assert!(Mesh::new().bounds().is_none());
    }

    #[test]
    fn test_vertex_normals_point_outward_on_cube() {
        let mut mesh = make_unit_cube();
        mesh.compute_vertex_normals();
        let n = mesh.vertices[6].normal.expect("normal computed");
        assert!(n.x > 0.0 && n.y > 0.0 && n.z > 0.0);
    }
}
