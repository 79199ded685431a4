//! Edge-to-face adjacency for indexed triangle meshes.

use hashbrown::HashMap;

/// Edge adjacency built from a face list.
///
/// Edges are keyed by their sorted vertex pair; the directed counts record how
/// often each edge is traversed `a -> b` with `a < b` versus `b -> a`.
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    /// Faces incident to each undirected edge `(min, max)`.
    pub edge_to_faces: HashMap<(u32, u32), Vec<u32>>,

    /// Per undirected edge: (traversals low->high, traversals high->low).
    pub edge_directions: HashMap<(u32, u32), (u32, u32)>,
}

impl MeshAdjacency {
    /// Build adjacency for the given faces.
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut edge_to_faces: HashMap<(u32, u32), Vec<u32>> =
            HashMap::with_capacity(faces.len() * 3 / 2);
        let mut edge_directions: HashMap<(u32, u32), (u32, u32)> =
            HashMap::with_capacity(faces.len() * 3 / 2);

        for (face_idx, face) in faces.iter().enumerate() {
            for i in 0..3 {
                let a = face[i];
                let b = face[(i + 1) % 3];
                let key = if a < b { (a, b) } else { (b, a) };

                edge_to_faces.entry(key).or_default().push(face_idx as u32);

                let dirs = edge_directions.entry(key).or_insert((0, 0));
                if a < b {
                    dirs.0 += 1;
                } else {
                    dirs.1 += 1;
                }
            }
        }

        Self {
            edge_to_faces,
            edge_directions,
        }
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// Edges used by exactly one face.
    pub fn boundary_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Edges used by more than two faces.
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() > 2)
            .map(|(&edge, _)| edge)
    }

    /// Interior edges whose two faces traverse them in the same direction.
    pub fn inconsistent_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_directions
            .iter()
            .filter(|(_, dirs)| dirs.0 + dirs.1 == 2 && dirs.0 != 1)
            .map(|(&edge, _)| edge)
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.boundary_edges().count()
    }

    pub fn non_manifold_edge_count(&self) -> usize {
        self.non_manifold_edges().count()
    }

    pub fn inconsistent_edge_count(&self) -> usize {
        self.inconsistent_edges().count()
    }

    /// True when every edge is shared by exactly two faces.
    pub fn is_watertight(&self) -> bool {
        self.edge_to_faces.values().all(|faces| faces.len() == 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::make_unit_cube;

    #[test]
    fn test_cube_is_watertight_and_consistent() {
        let cube = make_unit_cube();
        let adj = MeshAdjacency::build(&cube.faces);
        assert_eq!(adj.edge_count(), 18);
        assert!(adj.is_watertight());
        assert_eq!(adj.boundary_edge_count(), 0);
        assert_eq!(adj.non_manifold_edge_count(), 0);
        assert_eq!(adj.inconsistent_edge_count(), 0);
    }

    #[test]
    fn test_open_cube_has_boundary() {
        let mut cube = make_unit_cube();
        cube.faces.truncate(10);
        let adj = MeshAdjacency::build(&cube.faces);
        assert!(!adj.is_watertight());
        assert_eq!(adj.boundary_edge_count(), 4);
    }

    #[test]
    fn test_flipped_face_is_inconsistent() {
        let mut cube = make_unit_cube();
        cube.faces[0].swap(1, 2);
        let adj = MeshAdjacency::build(&cube.faces);
        assert!(adj.is_watertight());
        assert_eq!(adj.inconsistent_edge_count(), 3);
    }
}
