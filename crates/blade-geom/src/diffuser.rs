//! Inlet and outlet diffusers.
//!
//! A diffuser is a dome of revolution whose rim (radius `radius_base`) sits on
//! the hub and whose apex points away from the blade rows: downward at the
//! inlet, upward at the outlet. The dome is closed by a flat disk in the rim
//! plane. A non-zero `radius_top` truncates the apex into a flat opening of
//! that radius, where the outlet shaft attaches.
//!
//! Meridians:
//!
//! ```text
//! hemisphere  inlet   z = z_base + R_b (1 - cos θ)      r = R_b sin θ
//!             outlet  z = z_base + R_b cos θ
//! paraboloid  inlet   z = z_base + h (r / R_b)²
//!             outlet  z = z_base + h (1 - (r / R_b)²)
//! ```
//!
//! The hemisphere's height is its base radius; `height` only shapes the
//! paraboloid.

use std::f64::consts::FRAC_PI_2;

use blade_mesh::Mesh;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BladeError, BladeResult};
use crate::primitives::{MIN_SECTIONS, revolve_profile};

/// Dome profile of a diffuser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffuserShape {
    #[default]
    Hemisphere,
    Paraboloid,
}

impl std::str::FromStr for DiffuserShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hemisphere" => Ok(DiffuserShape::Hemisphere),
            "paraboloid" => Ok(DiffuserShape::Paraboloid),
            other => Err(format!("unknown diffuser shape '{}'", other)),
        }
    }
}

impl std::fmt::Display for DiffuserShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffuserShape::Hemisphere => write!(f, "hemisphere"),
            DiffuserShape::Paraboloid => write!(f, "paraboloid"),
        }
    }
}

/// Which end of the pump the diffuser closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffuserPosition {
    /// Below the rotor; apex points down, rim on top.
    Inlet,
    /// Above the last blade row; rim below, apex points up.
    Outlet,
}

/// Surface subdivisions of a diffuser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffuserResolution {
    /// Sections around the axis.
    pub azimuthal: usize,
    /// Segments along the meridian from apex to rim.
    pub meridional: usize,
}

impl Default for DiffuserResolution {
    fn default() -> Self {
        Self {
            azimuthal: 128,
            meridional: 64,
        }
    }
}

/// Build a closed, outward-oriented diffuser solid.
pub fn create_diffuser(
    shape: DiffuserShape,
    radius_base: f64,
    radius_top: f64,
    height: f64,
    z_base: f64,
    position: DiffuserPosition,
    resolution: &DiffuserResolution,
) -> BladeResult<Mesh> {
    if !(radius_base > 0.0 && radius_base.is_finite()) {
        return Err(BladeError::invalid_assembly(format!(
            "diffuser base radius must be > 0, got {}",
            radius_base
        )));
    }
    if !(0.0..radius_base).contains(&radius_top) {
        return Err(BladeError::invalid_assembly(format!(
            "diffuser top radius {} must lie in [0, {})",
            radius_top, radius_base
        )));
    }
    if shape == DiffuserShape::Paraboloid && !(height > 0.0 && height.is_finite()) {
        return Err(BladeError::invalid_assembly(format!(
            "paraboloid diffuser height must be > 0, got {}",
            height
        )));
    }
    if !z_base.is_finite() {
        return Err(BladeError::invalid_assembly("diffuser z_base must be finite"));
    }
    if resolution.azimuthal < MIN_SECTIONS || resolution.meridional < 1 {
        return Err(BladeError::invalid_assembly(format!(
            "diffuser resolution {}x{} is too coarse",
            resolution.azimuthal, resolution.meridional
        )));
    }

    let points = meridian(shape, radius_base, radius_top, height, z_base, position, resolution);

    // Apex (or the centre of the flat opening), the meridian, then the rim disk centre.
    let mut profile = Vec::with_capacity(points.len() + 2);
    if let Some(&(r, z)) = points.first()
        && r > 0.0
    {
        profile.push((0.0, z));
    }
    profile.extend_from_slice(&points);
    if let Some(&(_, z_rim)) = points.last() {
        profile.push((0.0, z_rim));
    }

    let mesh = revolve_profile(&profile, resolution.azimuthal)?;
    debug!(
        %shape,
        ?position,
        radius_base,
        radius_top,
        z_base,
        faces = mesh.face_count(),
        "Created diffuser"
    );
    Ok(mesh)
}

/// Meridian points from the apex (or opening edge) to the rim.
fn meridian(
    shape: DiffuserShape,
    radius_base: f64,
    radius_top: f64,
    height: f64,
    z_base: f64,
    position: DiffuserPosition,
    resolution: &DiffuserResolution,
) -> Vec<(f64, f64)> {
    let n = resolution.meridional;
    let step = |i: usize| i as f64 / n as f64;

    match shape {
        DiffuserShape::Hemisphere => {
            let start = (radius_top / radius_base).asin();
            (0..=n)
                .map(|i| {
                    let theta = if i == n {
                        FRAC_PI_2
                    } else {
                        start + (FRAC_PI_2 - start) * step(i)
                    };
                    let (sin, cos) = theta.sin_cos();
                    let r = if i == n { radius_base } else { radius_base * sin };
                    let z = match position {
                        DiffuserPosition::Inlet => z_base + radius_base * (1.0 - cos),
                        DiffuserPosition::Outlet => z_base + radius_base * cos,
                    };
                    (r, z)
                })
                .collect()
        }
        DiffuserShape::Paraboloid => (0..=n)
            .map(|i| {
                let r = if i == n {
                    radius_base
                } else {
                    radius_top + (radius_base - radius_top) * step(i)
                };
                let q = (r / radius_base).powi(2);
                let z = match position {
                    DiffuserPosition::Inlet => z_base + height * q,
                    DiffuserPosition::Outlet => z_base + height * (1.0 - q),
                };
                (r, z)
            })
            .collect(),
    }
}
