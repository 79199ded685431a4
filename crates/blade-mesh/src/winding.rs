//! Winding consistency and outward orientation.

use std::collections::VecDeque;
use tracing::{debug, info};

use crate::Mesh;
use crate::adjacency::MeshAdjacency;

/// Outcome of a winding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindingFix {
    /// Faces whose winding was reversed.
    pub flipped_faces: usize,
    /// Edge-connected components visited.
    pub components: usize,
}

/// Make winding consistent within each edge-connected component.
///
/// Breadth-first flood fill from the lowest unvisited face of every component:
/// a neighbor that traverses a shared edge in the same direction as the
/// (possibly already flipped) current face gets flipped.
pub fn fix_winding_order(mesh: &mut Mesh) -> WindingFix {
    let mut result = WindingFix::default();
    if mesh.faces.is_empty() {
        return result;
    }

    let adjacency = MeshAdjacency::build(&mesh.faces);
    let face_count = mesh.faces.len();
    let mut visited = vec![false; face_count];
    let mut flip = vec![false; face_count];
    let mut queue = VecDeque::new();

    for start in 0..face_count {
        if visited[start] {
            continue;
        }
        result.components += 1;
        visited[start] = true;
        queue.push_back(start);

        while let Some(face_idx) = queue.pop_front() {
            let face = oriented(mesh.faces[face_idx], flip[face_idx]);

            for edge_idx in 0..3 {
                let a = face[edge_idx];
                let b = face[(edge_idx + 1) % 3];
                let key = if a < b { (a, b) } else { (b, a) };

                let Some(neighbors) = adjacency.edge_to_faces.get(&key) else {
                    continue;
                };

                for &neighbor in neighbors {
                    let neighbor = neighbor as usize;
                    if visited[neighbor] {
                        continue;
                    }
                    visited[neighbor] = true;

                    if traverses(&mesh.faces[neighbor], a, b) {
                        flip[neighbor] = true;
                    }
                    queue.push_back(neighbor);
                }
            }
        }
    }

    for (face, _) in mesh.faces.iter_mut().zip(&flip).filter(|(_, f)| **f) {
        face.swap(1, 2);
        result.flipped_faces += 1;
    }

    if result.flipped_faces > 0 {
        info!(
            "Fixed winding order: flipped {} faces across {} component(s)",
            result.flipped_faces, result.components
        );
    } else {
        debug!(
            "Winding order already consistent across {} component(s)",
            result.components
        );
    }

    result
}

/// Flip every face if the signed volume is negative.
///
/// Returns whether the mesh was flipped. Only meaningful for closed meshes
/// with consistent winding.
pub fn orient_outward(mesh: &mut Mesh) -> bool {
    let signed_volume = mesh.signed_volume();
    if signed_volume < 0.0 {
        mesh.flip_faces();
        debug!(signed_volume, "Mesh was inside-out, flipped all faces");
        true
    } else {
        false
    }
}

fn oriented(face: [u32; 3], flipped: bool) -> [u32; 3] {
    if flipped {
        [face[0], face[2], face[1]]
    } else {
        face
    }
}

/// Whether the face contains the directed edge `a -> b`.
fn traverses(face: &[u32; 3], a: u32, b: u32) -> bool {
    (0..3).any(|i| face[i] == a && face[(i + 1) % 3] == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vertex;
    use crate::types::tests::make_unit_cube;

    #[test]
    fn test_consistent_cube_is_untouched() {
        let mut cube = make_unit_cube();
        let before = cube.clone();
        let fix = fix_winding_order(&mut cube);
        assert_eq!(fix.flipped_faces, 0);
        assert_eq!(fix.components, 1);
        assert_eq!(cube, before);
    }

    #[test]
    fn test_fix_single_flipped_face() {
        let mut cube = make_unit_cube();
        cube.faces[5].swap(1, 2);

        let fix = fix_winding_order(&mut cube);
        assert_eq!(fix.flipped_faces, 1);
        assert_eq!(MeshAdjacency::build(&cube.faces).inconsistent_edge_count(), 0);
        assert!((cube.signed_volume() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_fix_propagates_through_flipped_faces() {
        // Start face is wrong relative to the rest: the rest flips and the
        // result is consistent but inside-out.
        let mut cube = make_unit_cube();
        cube.faces[0].swap(1, 2);

        fix_winding_order(&mut cube);
        assert_eq!(MeshAdjacency::build(&cube.faces).inconsistent_edge_count(), 0);
        assert!((cube.signed_volume() + 1.0).abs() < 1e-10);

        assert!(orient_outward(&mut cube));
        assert!((cube.signed_volume() - 1.0).abs() < 1e-10);
        assert!(!orient_outward(&mut cube));
    }

    #[test]
    fn test_disconnected_components_counted() {
        let mut mesh = Mesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (0.5, -1.0)] {
            mesh.vertices.push(Vertex::from_coords(x, y, 0.0));
        }
        for (x, y) in [(5.0, 0.0), (6.0, 0.0), (5.5, 1.0), (5.5, -1.0)] {
            mesh.vertices.push(Vertex::from_coords(x, y, 0.0));
        }
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([0, 1, 3]);
        mesh.faces.push([4, 5, 6]);
        mesh.faces.push([4, 5, 7]);

        let fix = fix_winding_order(&mut mesh);
        assert_eq!(fix.components, 2);
        assert_eq!(fix.flipped_faces, 2);
        assert_eq!(mesh.faces[1], [0, 3, 1]);
        assert_eq!(mesh.faces[3], [4, 7, 5]);
    }

    #[test]
    fn test_empty_mesh() {
        let mut mesh = Mesh::new();
        assert_eq!(fix_winding_order(&mut mesh), WindingFix::default());
        assert!(!orient_outward(&mut mesh));
    }
}
