//! Named multi-part assemblies.
//!
//! Parts live in an index arena and are referred to by [`PartId`]. Each part
//! carries a mesh in local coordinates plus a rigid placement; groups collect
//! parts under a name so callers can export e.g. all rotor parts together.

use hashbrown::HashMap;
use nalgebra::Isometry3;
use tracing::debug;

use crate::Mesh;
use crate::error::{MeshError, MeshResult};

/// Index of a part within an [`Assembly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(usize);

impl PartId {
    /// Position of the part in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single mesh in an assembly.
#[derive(Debug, Clone)]
pub struct Part {
    /// Unique name within the assembly.
    pub name: String,

    /// Geometry in local coordinates.
    pub mesh: Mesh,

    /// Placement of the local frame in the assembly frame.
    pub transform: Isometry3<f64>,
}

impl Part {
    /// Create a part placed at the identity.
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: Isometry3::identity(),
        }
    }

    /// Set the placement.
    pub fn with_transform(mut self, transform: Isometry3<f64>) -> Self {
        self.transform = transform;
        self
    }

    /// The mesh in assembly coordinates.
    pub fn world_mesh(&self) -> Mesh {
        let mut mesh = self.mesh.clone();
        mesh.transform(&self.transform);
        mesh
    }
}

/// An ordered collection of named parts and named groups of parts.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    name: String,
    parts: Vec<Part>,
    by_name: HashMap<String, PartId>,
    groups: Vec<(String, Vec<PartId>)>,
}

impl Assembly {
    /// Create an empty assembly.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a part. Part names must be unique.
    pub fn add_part(&mut self, part: Part) -> MeshResult<PartId> {
        if self.by_name.contains_key(&part.name) {
            return Err(MeshError::invalid_topology(format!(
                "assembly '{}' already has a part named '{}'",
                self.name, part.name
            )));
        }
        let id = PartId(self.parts.len());
        debug!(
            assembly = %self.name,
            part = %part.name,
            faces = part.mesh.face_count(),
            "Added part"
        );
        self.by_name.insert(part.name.clone(), id);
        self.parts.push(part);
        Ok(id)
    }

    /// Define or replace a named group of parts.
    pub fn set_group(&mut self, name: impl Into<String>, members: Vec<PartId>) -> MeshResult<()> {
        if let Some(bad) = members.iter().find(|id| id.0 >= self.parts.len()) {
            return Err(MeshError::invalid_topology(format!(
                "group references unknown part index {}",
                bad.0
            )));
        }
        let name = name.into();
        match self.groups.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = members,
            None => self.groups.push((name, members)),
        }
        Ok(())
    }

    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.0)
    }

    pub fn part_by_name(&self, name: &str) -> Option<&Part> {
        self.by_name.get(name).and_then(|&id| self.part(id))
    }

    pub fn parts(&self) -> impl Iterator<Item = (PartId, &Part)> + '_ {
        self.parts.iter().enumerate().map(|(i, p)| (PartId(i), p))
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Group names in definition order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Members of a named group.
    pub fn group(&self, name: &str) -> Option<&[PartId]> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, members)| members.as_slice())
    }

    /// Concatenate the world meshes of a group's parts.
    pub fn group_mesh(&self, name: &str) -> Option<Mesh> {
        let members = self.group(name)?;
        let meshes: Vec<Mesh> = members
            .iter()
            .filter_map(|&id| self.part(id))
            .map(Part::world_mesh)
            .collect();
        Some(Mesh::concatenate(&meshes))
    }

    /// Concatenate every part in assembly coordinates.
    pub fn to_merged_mesh(&self) -> Mesh {
        let meshes: Vec<Mesh> = self.parts.iter().map(Part::world_mesh).collect();
        Mesh::concatenate(&meshes)
    }
}
