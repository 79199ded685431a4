//! Closed solids of revolution about the +z axis.

use std::f64::consts::TAU;

use blade_mesh::{Mesh, Vertex};
use tracing::trace;

use crate::error::{BladeError, BladeResult};

/// Fewest azimuthal sections that enclose a volume.
pub const MIN_SECTIONS: usize = 3;

/// Revolve a meridional profile into a closed, outward-oriented solid.
///
/// `profile` is a sequence of `(radius, z)` points that starts and ends on
/// the axis (`radius == 0`) with every interior point strictly off it. The
/// profile is swept through `sections` evenly spaced azimuths without a
/// duplicated seam; the two axis points become single apex vertices.
pub fn revolve_profile(profile: &[(f64, f64)], sections: usize) -> BladeResult<Mesh> {
    if sections < MIN_SECTIONS {
        return Err(BladeError::invalid_assembly(format!(
            "a solid of revolution needs at least {} sections, got {}",
            MIN_SECTIONS, sections
        )));
    }
    let (first, last) = match profile {
        [first, .., last] if profile.len() >= 3 => (*first, *last),
        _ => {
            return Err(BladeError::invalid_assembly(format!(
                "profile needs at least 3 points, got {}",
                profile.len()
            )));
        }
    };
    if first.0 != 0.0 || last.0 != 0.0 {
        return Err(BladeError::invalid_assembly(
            "profile must start and end on the axis",
        ));
    }
    if let Some(bad) = profile
        .iter()
        .find(|(r, z)| !r.is_finite() || !z.is_finite())
    {
        return Err(BladeError::invalid_assembly(format!(
            "profile point ({}, {}) is not finite",
            bad.0, bad.1
        )));
    }
    let interior = &profile[1..profile.len() - 1];
    if interior.iter().any(|&(r, _)| r <= 0.0) {
        return Err(BladeError::invalid_assembly(
            "interior profile points must lie off the axis",
        ));
    }

    let rings = interior.len();
    let mut mesh = Mesh::with_capacity(rings * sections + 2, 2 * sections * (rings + 1));

    // Vertex 0 is the first apex, then one ring per interior point, then the last apex.
    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, first.1));
    for &(r, z) in interior {
        mesh.vertices.extend((0..sections).map(|k| {
            let (sin, cos) = (TAU * k as f64 / sections as f64).sin_cos();
            Vertex::from_coords(r * cos, r * sin, z)
        }));
    }
    let last_apex = (rings * sections + 1) as u32;
    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, last.1));

    let ring = |s: usize, k: usize| (1 + s * sections + k % sections) as u32;

    for k in 0..sections {
        mesh.faces.push([0, ring(0, k + 1), ring(0, k)]);
    }
    for s in 0..rings - 1 {
        for k in 0..sections {
            let (a, b) = (ring(s, k), ring(s, k + 1));
            let (c, d) = (ring(s + 1, k + 1), ring(s + 1, k));
            mesh.faces.push([a, b, c]);
            mesh.faces.push([a, c, d]);
        }
    }
    for k in 0..sections {
        mesh.faces.push([ring(rings - 1, k), ring(rings - 1, k + 1), last_apex]);
    }

    let flipped = mesh.orient_outward();
    trace!(
        rings,
        sections,
        flipped,
        faces = mesh.face_count(),
        "Revolved profile"
    );
    Ok(mesh)
}

/// Closed cylinder of `radius` spanning `[z_base, z_base + height]`.
pub fn cylinder(radius: f64, height: f64, z_base: f64, sections: usize) -> BladeResult<Mesh> {
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(BladeError::invalid_assembly(format!(
            "cylinder radius must be > 0, got {}",
            radius
        )));
    }
    if !(height > 0.0 && height.is_finite()) {
        return Err(BladeError::invalid_assembly(format!(
            "cylinder height must be > 0, got {}",
            height
        )));
    }
    let top = z_base + height;
    revolve_profile(
        &[(0.0, z_base), (radius, z_base), (radius, top), (0.0, top)],
        sections,
    )
}
