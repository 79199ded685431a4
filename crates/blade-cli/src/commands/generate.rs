//! blade generate command - sample, triangulate and save one blade.

use std::path::Path;

use anyhow::{Context, Result};
use blade_geom::{BladeBuilder, BladeParameters};
use colored::Colorize;
use serde::Serialize;

use crate::{Cli, OutputFormat, SamplingArgs, output};

#[derive(Serialize)]
struct GenerateResult {
    input: String,
    output: String,
    span_samples: usize,
    chord_samples: usize,
    closed: bool,
    vertices: usize,
    faces: usize,
    flipped: bool,
    volume: f64,
    surface_area: f64,
    z_range: [f64; 2],
}

pub fn run(
    input: &Path,
    output_path: &Path,
    sampling: &SamplingArgs,
    shell: bool,
    cli: &Cli,
) -> Result<()> {
    let params = BladeParameters::load(input)
        .with_context(|| format!("Failed to load blade parameters from {:?}", input))?;

    let config = sampling.config();
    output::info(
        &format!(
            "Sampling {} span rows x {} chord stations...",
            config.span_samples, config.chord_samples
        ),
        cli.format,
        cli.quiet,
    );

    if shell {
        output::warning(
            "Root and tip left open; the mesh is not watertight",
            cli.format,
            cli.quiet,
        );
    }

    let built = BladeBuilder::new(&params)
        .sampling(config)
        .as_solid(!shell)
        .build()?;

    built
        .solid
        .mesh
        .save(output_path)
        .with_context(|| format!("Failed to save blade mesh to {:?}", output_path))?;

    let (z_min, z_max) = built.grid.z_range();
    let report = &built.solid.report;
    let result = GenerateResult {
        input: input.display().to_string(),
        output: output_path.display().to_string(),
        span_samples: built.grid.span_count(),
        chord_samples: built.grid.chord_count(),
        closed: built.solid.closed,
        vertices: report.vertex_count,
        faces: report.face_count,
        flipped: built.solid.flipped,
        volume: report.volume,
        surface_area: report.surface_area,
        z_range: [z_min, z_max],
    };

    match cli.format {
        OutputFormat::Json => output::print(&result, cli.format, cli.quiet),
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Blade mesh saved to {}", output_path.display()),
                    cli.format,
                    cli.quiet,
                );
                println!(
                    "  {}: {} x {}",
                    "Grid".cyan(),
                    result.span_samples,
                    result.chord_samples
                );
                println!(
                    "  {}: {}",
                    "Topology".cyan(),
                    if result.closed { "closed solid" } else { "open shell" }
                );
                println!("  {}: {}", "Vertices".cyan(), result.vertices);
                println!("  {}: {}", "Faces".cyan(), result.faces);
                println!("  {}: {:.6e}", "Volume".cyan(), result.volume);
                println!("  {}: {:.6e}", "Surface area".cyan(), result.surface_area);
                println!(
                    "  {}: [{:.6}, {:.6}]",
                    "Axial extent".cyan(),
                    result.z_range[0],
                    result.z_range[1]
                );
            }
        }
    }

    Ok(())
}
