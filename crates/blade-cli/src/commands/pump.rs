//! blade pump command - assemble rotor, vane and diffusers and export groups.

use std::path::Path;

use anyhow::{Context, Result, bail};
use blade_geom::{BladeParameters, PumpLayout, assemble_pump};
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::{Cli, ExportFormat, OutputFormat, SamplingArgs, output};

#[derive(Serialize)]
struct PumpResult {
    output_dir: String,
    rotor_blades: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    vane_blades: Option<usize>,
    parts: usize,
    groups: Vec<GroupInfo>,
}

#[derive(Serialize)]
struct GroupInfo {
    name: String,
    file: String,
    parts: usize,
    faces: usize,
}

/// Read a layout file; JSON or TOML by extension.
fn load_layout(path: &Path) -> Result<PumpLayout> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pump layout from {:?}", path))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => serde_json::from_str(&contents)
            .with_context(|| format!("Invalid pump layout in {:?}", path)),
        Some("toml") => {
            toml::from_str(&contents).with_context(|| format!("Invalid pump layout in {:?}", path))
        }
        _ => bail!("Unsupported layout file {:?}: expected .json or .toml", path),
    }
}

pub fn run(
    rotor_path: &Path,
    vane_path: Option<&Path>,
    layout_path: Option<&Path>,
    output_dir: &Path,
    mesh_format: ExportFormat,
    sampling: &SamplingArgs,
    cli: &Cli,
) -> Result<()> {
    let rotor = BladeParameters::load(rotor_path)
        .with_context(|| format!("Failed to load rotor parameters from {:?}", rotor_path))?;
    let vane = vane_path
        .map(|path| {
            BladeParameters::load(path)
                .with_context(|| format!("Failed to load vane parameters from {:?}", path))
        })
        .transpose()?;
    let layout = match layout_path {
        Some(path) => load_layout(path)?,
        None => PumpLayout::default(),
    };
    debug!(?layout, "Pump layout");

    output::info(
        &format!(
            "Assembling {} rotor blades{}...",
            layout.rotor_blades,
            if vane.is_some() {
                format!(" and {} vane blades", layout.vane_blades)
            } else {
                String::new()
            }
        ),
        cli.format,
        cli.quiet,
    );

    let pump = assemble_pump(&rotor, vane.as_ref(), &sampling.config(), &layout)?;
    let written = pump.export(output_dir, mesh_format.into())?;

    let groups = pump
        .group_names()
        .into_iter()
        .zip(&written)
        .map(|(name, file)| GroupInfo {
            name: name.to_string(),
            file: file.display().to_string(),
            parts: pump.assembly().group(name).map_or(0, |ids| ids.len()),
            faces: pump.group_mesh(name).map_or(0, |mesh| mesh.face_count()),
        })
        .collect();

    let result = PumpResult {
        output_dir: output_dir.display().to_string(),
        rotor_blades: layout.rotor_blades,
        vane_blades: vane.as_ref().map(|_| layout.vane_blades),
        parts: pump.assembly().part_count(),
        groups,
    };

    match cli.format {
        OutputFormat::Json => output::print(&result, cli.format, cli.quiet),
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!(
                        "Wrote {} files to {}",
                        result.groups.len(),
                        output_dir.display()
                    ),
                    cli.format,
                    cli.quiet,
                );
                println!("  {}: {}", "Parts".cyan(), result.parts);
                for group in &result.groups {
                    println!(
                        "  {:<9} {:>3} parts {:>8} faces  {}",
                        group.name.cyan(),
                        group.parts,
                        group.faces,
                        group.file
                    );
                }
            }
        }
    }

    Ok(())
}
