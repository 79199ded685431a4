//! Pump assembly: blade rows on hub sections between two diffusers.
//!
//! Axial layout, bottom to top:
//!
//! ```text
//! inlet diffuser   [-hub, 0]                  apex down
//! rotor row        [0, rotor_height]          hub cylinder + N rotor blades
//! vane row         [rotor_height, + vane]     optional, same hub radius
//! outlet diffuser  from the top of the last row, apex up
//! shaft            on top of the outlet, length shaft_length
//! ```
//!
//! Every solid is a part in a [`blade_mesh::Assembly`] arena; named groups
//! `inlet`, `rotor`, `vane` (when present), `outlet` and `assembly` collect
//! them for export.

use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use blade_mesh::{Assembly, Mesh, MeshFormat, OperationTimer, Part, PartId, log_mesh_stats};
use nalgebra::{Isometry3, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::diffuser::{DiffuserPosition, DiffuserResolution, DiffuserShape, create_diffuser};
use crate::error::{BladeError, BladeResult};
use crate::params::BladeParameters;
use crate::primitives::cylinder;
use crate::sampler::{SamplingConfig, sample_blade_surface_with};
use crate::solid::{BladeSolid, build_blade_solid};

/// Hub radii of stacked rows must agree within this tolerance.
pub const HUB_RADIUS_TOLERANCE: f64 = 1e-6;

/// Group names exposed by [`PumpAssembly`].
pub const GROUP_INLET: &str = "inlet";
pub const GROUP_ROTOR: &str = "rotor";
pub const GROUP_VANE: &str = "vane";
pub const GROUP_OUTLET: &str = "outlet";
pub const GROUP_ASSEMBLY: &str = "assembly";

/// One blade row: a hub section and N rotated blade copies.
#[derive(Debug, Clone)]
pub struct BladeRow {
    /// Hub cylinder section.
    pub hub: Mesh,
    /// Blade copies in assembly coordinates, blade `i` rotated by `2πi/N`.
    pub blades: Vec<Mesh>,
    /// Axial shift applied to centre the blade on the hub section.
    pub z_shift: f64,
}

impl BladeRow {
    /// Hub followed by every blade, concatenated.
    pub fn to_mesh(&self) -> Mesh {
        Mesh::concatenate(std::iter::once(&self.hub).chain(&self.blades))
    }
}

/// Place `n_blades` copies of one blade evenly around a hub section.
///
/// The hub section is a closed cylinder of `hub_radius` spanning
/// `[z_base, z_base + hub_height]`. The blade is shifted axially so its
/// extent is centred on the section, then copy `i` is rotated by `2πi/N`
/// about +z.
///
/// Fails with `InvalidAssembly` when `n_blades` is zero or the section is
/// shorter than the blade's axial extent.
pub fn assemble_blades_on_hub(
    blade: &BladeSolid,
    n_blades: usize,
    hub_radius: f64,
    hub_height: f64,
    z_base: f64,
    hub_sections: usize,
) -> BladeResult<BladeRow> {
    if n_blades == 0 {
        return Err(BladeError::invalid_assembly("a blade row needs at least one blade"));
    }
    let (z_min, z_max) = blade
        .mesh
        .bounds()
        .map(|(min, max)| (min.z, max.z))
        .ok_or_else(|| BladeError::invalid_assembly("blade mesh is empty"))?;
    let blade_span = z_max - z_min;
    if hub_height < blade_span {
        return Err(BladeError::invalid_assembly(format!(
            "hub section height {} is less than the blade's axial extent {}",
            hub_height, blade_span
        )));
    }

    let _timer = OperationTimer::new("assemble_blades_on_hub");
    let hub = cylinder(hub_radius, hub_height, z_base, hub_sections)?;
    let z_shift = z_base + hub_height / 2.0 - (z_min + blade_span / 2.0);

    let blades: Vec<Mesh> = (0..n_blades)
        .into_par_iter()
        .map(|i| {
            let angle = TAU * i as f64 / n_blades as f64;
            let placement = Isometry3::new(Vector3::new(0.0, 0.0, z_shift), Vector3::z() * angle);
            let mut copy = blade.mesh.clone();
            copy.transform(&placement);
            copy
        })
        .collect();

    debug!(n_blades, hub_radius, hub_height, z_base, z_shift, "Assembled blade row");
    Ok(BladeRow { hub, blades, z_shift })
}

/// Layout of a pump assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PumpLayout {
    /// Axial length of the rotor hub section.
    pub rotor_height: f64,
    /// Axial length of the vane hub section.
    pub vane_height: f64,
    pub rotor_blades: usize,
    pub vane_blades: usize,
    /// Radius of the outlet shaft; must be smaller than the hub radius.
    pub shaft_radius: f64,
    pub shaft_length: f64,
    pub inlet_shape: DiffuserShape,
    pub outlet_shape: DiffuserShape,
    /// Azimuthal sections of hub and shaft cylinders.
    pub hub_sections: usize,
    pub diffuser_resolution: DiffuserResolution,
    /// Close blades into solids; otherwise use open shells.
    pub as_solid: bool,
}

impl Default for PumpLayout {
    fn default() -> Self {
        Self {
            rotor_height: 0.2,
            vane_height: 0.2,
            rotor_blades: 12,
            vane_blades: 12,
            shaft_radius: 0.05,
            shaft_length: 0.2,
            inlet_shape: DiffuserShape::Hemisphere,
            outlet_shape: DiffuserShape::Hemisphere,
            hub_sections: 128,
            diffuser_resolution: DiffuserResolution::default(),
            as_solid: true,
        }
    }
}

/// A composed pump: the part arena plus the blades it was built from.
#[derive(Debug, Clone)]
pub struct PumpAssembly {
    assembly: Assembly,
    rotor_blade: BladeSolid,
    vane_blade: Option<BladeSolid>,
}

impl PumpAssembly {
    /// The underlying part arena.
    pub fn assembly(&self) -> &Assembly {
        &self.assembly
    }

    /// The single rotor blade every rotor copy was made from.
    pub fn rotor_blade(&self) -> &BladeSolid {
        &self.rotor_blade
    }

    pub fn vane_blade(&self) -> Option<&BladeSolid> {
        self.vane_blade.as_ref()
    }

    /// Defined groups, in `inlet, rotor, [vane,] outlet, assembly` order.
    pub fn group_names(&self) -> Vec<&str> {
        self.assembly.group_names().collect()
    }

    /// Concatenated mesh of one group.
    pub fn group_mesh(&self, name: &str) -> Option<Mesh> {
        self.assembly.group_mesh(name)
    }

    /// Write one `<group>.<ext>` file per group into `directory`.
    ///
    /// The directory is created if missing. Returns the written paths in
    /// group order.
    pub fn export(&self, directory: &Path, format: MeshFormat) -> BladeResult<Vec<PathBuf>> {
        std::fs::create_dir_all(directory)
            .map_err(|e| blade_mesh::MeshError::io_write(directory, e))?;

        let mut written = Vec::new();
        for name in self.assembly.group_names() {
            let Some(mut mesh) = self.assembly.group_mesh(name) else {
                continue;
            };
            if matches!(format, MeshFormat::Obj) {
                mesh.compute_vertex_normals();
            }
            let path = directory.join(format!("{}.{}", name, format.extension()));
            mesh.save(&path)?;
            written.push(path);
        }
        info!(
            directory = %directory.display(),
            files = written.len(),
            format = format.extension(),
            "Exported pump groups"
        );
        Ok(written)
    }
}

/// Sample and triangulate one blade row's blade.
fn blade_solid(
    params: &BladeParameters,
    sampling: &SamplingConfig,
    as_solid: bool,
) -> BladeResult<BladeSolid> {
    let grid = sample_blade_surface_with(params, sampling)?;
    build_blade_solid(&grid, as_solid)
}

fn check_layout(layout: &PumpLayout) -> BladeResult<()> {
    let positive = [
        ("rotor_height", layout.rotor_height),
        ("vane_height", layout.vane_height),
        ("shaft_radius", layout.shaft_radius),
        ("shaft_length", layout.shaft_length),
    ];
    for (name, value) in positive {
        if !(value > 0.0 && value.is_finite()) {
            return Err(BladeError::invalid_assembly(format!(
                "{} must be a finite value > 0, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

/// Add every mesh as a part named `<prefix>_<index>`.
fn add_parts(
    assembly: &mut Assembly,
    prefix: &str,
    meshes: Vec<Mesh>,
) -> BladeResult<Vec<PartId>> {
    let width = meshes.len().to_string().len();
    meshes
        .into_iter()
        .enumerate()
        .map(|(i, mesh)| {
            let name = format!("{}_{:0width$}", prefix, i, width = width);
            assembly
                .add_part(Part::new(name, mesh))
                .map_err(BladeError::from)
        })
        .collect()
}

/// Add a hub section and its blades, returning the row's part ids.
fn add_row(assembly: &mut Assembly, prefix: &str, row: BladeRow) -> BladeResult<Vec<PartId>> {
    let mut ids = vec![assembly.add_part(Part::new(format!("{}_hub", prefix), row.hub))?];
    ids.extend(add_parts(assembly, &format!("{}_blade", prefix), row.blades)?);
    Ok(ids)
}

/// Compose a pump from a rotor blade and an optional vane blade.
///
/// Both blades are sampled with `sampling` (in parallel when a vane is
/// given). The vane's hub radius must match the rotor's within
/// [`HUB_RADIUS_TOLERANCE`], and the shaft radius must be smaller than it
/// so the outlet dome keeps an opening to close.
pub fn assemble_pump(
    rotor: &BladeParameters,
    vane: Option<&BladeParameters>,
    sampling: &SamplingConfig,
    layout: &PumpLayout,
) -> BladeResult<PumpAssembly> {
    check_layout(layout)?;
    let hub_radius = rotor.hub_radius();
    if let Some(vane) = vane
        && (vane.hub_radius() - hub_radius).abs() > HUB_RADIUS_TOLERANCE
    {
        return Err(BladeError::invalid_assembly(format!(
            "vane hub radius {} must equal rotor hub radius {}",
            vane.hub_radius(),
            hub_radius
        )));
    }
    if layout.shaft_radius >= hub_radius {
        return Err(BladeError::invalid_assembly(format!(
            "outlet shaft radius {} must be smaller than hub radius {}",
            layout.shaft_radius, hub_radius
        )));
    }

    let _timer = OperationTimer::new("assemble_pump");

    let (rotor_blade, vane_blade) = rayon::join(
        || blade_solid(rotor, sampling, layout.as_solid),
        || vane.map(|params| blade_solid(params, sampling, layout.as_solid)).transpose(),
    );
    let (rotor_blade, vane_blade) = (rotor_blade?, vane_blade?);

    let mut assembly = Assembly::new("pump");
    let resolution = &layout.diffuser_resolution;

    let inlet = create_diffuser(
        layout.inlet_shape,
        hub_radius,
        0.0,
        hub_radius,
        -hub_radius,
        DiffuserPosition::Inlet,
        resolution,
    )?;
    let inlet_ids = vec![assembly.add_part(Part::new("inlet_diffuser", inlet))?];

    let rotor_row = assemble_blades_on_hub(
        &rotor_blade,
        layout.rotor_blades,
        hub_radius,
        layout.rotor_height,
        0.0,
        layout.hub_sections,
    )?;
    let rotor_ids = add_row(&mut assembly, "rotor", rotor_row)?;
    let mut current_z = layout.rotor_height;

    let vane_ids = match &vane_blade {
        Some(blade) => {
            let row = assemble_blades_on_hub(
                blade,
                layout.vane_blades,
                hub_radius,
                layout.vane_height,
                current_z,
                layout.hub_sections,
            )?;
            current_z += layout.vane_height;
            Some(add_row(&mut assembly, "vane", row)?)
        }
        None => None,
    };

    let outlet = create_diffuser(
        layout.outlet_shape,
        hub_radius,
        layout.shaft_radius,
        hub_radius,
        current_z,
        DiffuserPosition::Outlet,
        resolution,
    )?;
    let shaft = cylinder(
        layout.shaft_radius,
        layout.shaft_length,
        current_z,
        layout.hub_sections,
    )?;
    let outlet_ids = vec![
        assembly.add_part(Part::new("outlet_diffuser", outlet))?,
        assembly.add_part(Part::new("outlet_shaft", shaft))?,
    ];

    let all: Vec<PartId> = assembly.parts().map(|(id, _)| id).collect();
    assembly.set_group(GROUP_INLET, inlet_ids)?;
    assembly.set_group(GROUP_ROTOR, rotor_ids)?;
    if let Some(ids) = vane_ids {
        assembly.set_group(GROUP_VANE, ids)?;
    }
    assembly.set_group(GROUP_OUTLET, outlet_ids)?;
    assembly.set_group(GROUP_ASSEMBLY, all)?;

    if let Some(merged) = assembly.group_mesh(GROUP_ASSEMBLY) {
        log_mesh_stats(&merged, "pump assembly");
    }
    info!(
        parts = assembly.part_count(),
        rotor_blades = layout.rotor_blades,
        vane = vane_blade.is_some(),
        top = current_z,
        "Composed pump"
    );

    Ok(PumpAssembly {
        assembly,
        rotor_blade,
        vane_blade,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BladeErrorCode;
    use crate::params::tests::reference_blade;
    use crate::sampler::sample_blade_surface;

    fn small_layout() -> PumpLayout {
        PumpLayout {
            rotor_blades: 4,
            vane_blades: 3,
            hub_sections: 24,
            diffuser_resolution: DiffuserResolution {
                azimuthal: 24,
                meridional: 6,
            },
            rotor_height: 0.4,
            vane_height: 0.4,
            ..PumpLayout::default()
        }
    }

    fn small_sampling() -> SamplingConfig {
        SamplingConfig::new(5, 12)
    }

    fn reference_solid() -> BladeSolid {
        let grid = sample_blade_surface(&reference_blade(), 5, 12).unwrap();
        build_blade_solid(&grid, true).unwrap()
    }

    #[test]
    fn test_row_centres_blade_on_hub() {
        let blade = reference_solid();
        let row = assemble_blades_on_hub(&blade, 6, 0.121, 0.5, 1.0, 32).unwrap();
        assert_eq!(row.blades.len(), 6);

        let (min, max) = row.blades[0].bounds().unwrap();
        let centre = 0.5 * (min.z + max.z);
        assert!((centre - 1.25).abs() < 1e-12);

        // Copies keep the blade volume.
        for copy in &row.blades {
            assert!((copy.signed_volume() - blade.signed_volume()).abs() < 1e-12);
        }
        assert_eq!(
            row.to_mesh().face_count(),
            row.hub.face_count() + 6 * blade.mesh.face_count()
        );
    }

    #[test]
    fn test_row_rotation() {
        let blade = reference_solid();
        let row = assemble_blades_on_hub(&blade, 4, 0.121, 0.5, 0.0, 16).unwrap();
        let p0 = row.blades[0].vertices[0].position;
        let p1 = row.blades[1].vertices[0].position;
        // A quarter turn maps (x, y) to (-y, x).
        assert!((p1.x + p0.y).abs() < 1e-12);
        assert!((p1.y - p0.x).abs() < 1e-12);
        assert!((p1.z - p0.z).abs() < 1e-12);
    }

    #[test]
    fn test_row_rejects_short_hub_and_zero_blades() {
        let blade = reference_solid();
        let err = assemble_blades_on_hub(&blade, 6, 0.121, 0.1, 0.0, 32).unwrap_err();
        assert_eq!(err.code(), BladeErrorCode::InvalidAssembly);
        assert!(assemble_blades_on_hub(&blade, 0, 0.121, 0.5, 0.0, 32).is_err());
    }

    #[test]
    fn test_pump_without_vane() {
        let pump = assemble_pump(&reference_blade(), None, &small_sampling(), &small_layout())
            .unwrap();
        assert_eq!(pump.group_names(), vec!["inlet", "rotor", "outlet", "assembly"]);
        assert!(pump.vane_blade().is_none());

        // inlet + rotor hub + 4 blades + outlet diffuser + shaft
        assert_eq!(pump.assembly().part_count(), 8);

        let (inlet_min, inlet_max) = pump.group_mesh("inlet").unwrap().bounds().unwrap();
        assert!((inlet_min.z + 0.121).abs() < 1e-12);
        assert!(inlet_max.z.abs() < 1e-12);

        let (outlet_min, _) = pump.group_mesh("outlet").unwrap().bounds().unwrap();
        assert!((outlet_min.z - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_pump_with_vane() {
        let rotor = reference_blade();
        let vane = reference_blade();
        let pump = assemble_pump(&rotor, Some(&vane), &small_sampling(), &small_layout()).unwrap();
        assert_eq!(
            pump.group_names(),
            vec!["inlet", "rotor", "vane", "outlet", "assembly"]
        );
        assert_eq!(pump.assembly().group("vane").unwrap().len(), 4);

        let (_, top) = pump.group_mesh("outlet").unwrap().bounds().unwrap();
        assert!((top.z - (0.8 + 0.2)).abs() < 1e-12);

        let merged = pump.group_mesh("assembly").unwrap();
        let parts: usize = pump
            .assembly()
            .parts()
            .map(|(_, part)| part.mesh.face_count())
            .sum();
        assert_eq!(merged.face_count(), parts);
    }

    #[test]
    fn test_pump_layout_errors() {
        let rotor = reference_blade();
        let mut record = rotor.to_record();
        record.hub_radius = 0.12;
        let vane = BladeParameters::from_record(record).unwrap();
        let err = assemble_pump(&rotor, Some(&vane), &small_sampling(), &small_layout())
            .unwrap_err();
        assert_eq!(err.code(), BladeErrorCode::InvalidAssembly);

        let layout = PumpLayout {
            shaft_radius: 0.2,
            ..small_layout()
        };
        assert!(assemble_pump(&rotor, None, &small_sampling(), &layout).is_err());

        let layout = PumpLayout {
            rotor_height: 0.1,
            ..small_layout()
        };
        let err = assemble_pump(&rotor, None, &small_sampling(), &layout).unwrap_err();
        assert!(err.to_string().contains("axial extent"));
    }

    #[test]
    fn test_shaft_as_wide_as_hub_is_rejected() {
        let rotor = reference_blade();
        let layout = PumpLayout {
            shaft_radius: rotor.hub_radius(),
            ..small_layout()
        };
        let err = assemble_pump(&rotor, None, &small_sampling(), &layout).unwrap_err();
        assert_eq!(err.code(), BladeErrorCode::InvalidAssembly);
        assert!(err.to_string().contains("shaft radius"), "{err}");

        let layout = PumpLayout {
            shaft_radius: rotor.hub_radius() - 1e-3,
            ..small_layout()
        };
        assert!(assemble_pump(&rotor, None, &small_sampling(), &layout).is_ok());
    }

    #[test]
    fn test_layout_defaults_roundtrip() {
        let layout = PumpLayout::default();
        assert_eq!(layout.rotor_blades, 12);
        assert_eq!(layout.hub_sections, 128);
        let toml_str = toml::to_string(&layout).unwrap();
        assert_eq!(toml::from_str::<PumpLayout>(&toml_str).unwrap(), layout);
        let partial: PumpLayout = toml::from_str("rotor_blades = 6").unwrap();
        assert_eq!(partial.rotor_blades, 6);
        assert_eq!(partial.vane_height, 0.2);
    }
}
