//! blade template command - write a starting blade record or pump layout.

use std::path::Path;

use anyhow::{Context, Result, bail};
use blade_geom::{BladeParameters, LayerParameters, PumpLayout};
use serde::Serialize;

use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct TemplateResult {
    output: String,
    kind: &'static str,
}

/// Five-layer rotor blade with a mid-span camber bulge.
fn starter_blade() -> Result<BladeParameters> {
    let layers = [0.0, 0.25, 0.5, 0.75, 1.0]
        .into_iter()
        .zip([0.02, 0.03, 0.03, 0.02, 0.01])
        .map(|(span, max_camber)| LayerParameters {
            span,
            leading_edge_angle: 0.0,
            max_camber,
            max_thickness: 0.01,
            camber_shape: 0.4,
            plateau_start: 0.2,
            plateau_end: 0.8,
            thickness_steepness: 2.0,
            camber_sharpness: None,
            taper: None,
            radius: None,
        })
        .collect();
    Ok(BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers)?)
}

fn write_layout(path: &Path) -> Result<()> {
    let layout = PumpLayout::default();
    let contents = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::to_string_pretty(&layout)?,
        Some("toml") => toml::to_string_pretty(&layout)?,
        _ => bail!("Unsupported layout file {:?}: expected .json or .toml", path),
    };
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write pump layout to {:?}", path))
}

pub fn run(output_path: &Path, layout: bool, cli: &Cli) -> Result<()> {
    let kind = if layout {
        write_layout(output_path)?;
        "layout"
    } else {
        starter_blade()?
            .save(output_path)
            .with_context(|| format!("Failed to write blade parameters to {:?}", output_path))?;
        "blade"
    };

    let result = TemplateResult {
        output: output_path.display().to_string(),
        kind,
    };
    match cli.format {
        OutputFormat::Json => output::print(&result, cli.format, cli.quiet),
        OutputFormat::Text => output::success(
            &format!("Wrote {} template to {}", kind, output_path.display()),
            cli.format,
            cli.quiet,
        ),
    }

    Ok(())
}
