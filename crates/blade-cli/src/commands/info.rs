//! blade info command - display a blade record and resolved layers.

use std::path::Path;

use anyhow::{Context, Result};
use blade_geom::{BladeParameters, LayerProfile, SpanInterpolator};
use colored::Colorize;
use serde::Serialize;

use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct BladeInfo {
    path: String,
    angular_span: f64,
    height: f64,
    hub_radius: f64,
    shroud_radius: f64,
    z0: f64,
    parameter_count: usize,
    layers: Vec<LayerInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resolved: Vec<LayerInfo>,
}

#[derive(Serialize)]
struct LayerInfo {
    span: f64,
    radius: f64,
    leading_edge_angle: f64,
    max_camber: f64,
    max_thickness: f64,
    camber_shape: f64,
    plateau: [f64; 2],
    thickness_steepness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    camber_sharpness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    taper: Option<f64>,
}

impl From<&LayerProfile> for LayerInfo {
    fn from(p: &LayerProfile) -> Self {
        Self {
            span: p.span,
            radius: p.radius,
            leading_edge_angle: p.leading_edge_angle,
            max_camber: p.max_camber,
            max_thickness: p.max_thickness,
            camber_shape: p.camber_shape,
            plateau: [p.plateau_start, p.plateau_end],
            thickness_steepness: p.thickness_steepness,
            camber_sharpness: p.camber_sharpness,
            taper: p.taper,
        }
    }
}

fn print_layer_table(title: &str, layers: &[LayerInfo]) {
    println!("\n{}", title.bold());
    println!(
        "  {:>6} {:>9} {:>8} {:>8} {:>8} {:>6} {:>11} {:>6}",
        "span", "radius", "theta0", "camber", "thick", "alpha", "plateau", "beta"
    );
    for l in layers {
        println!(
            "  {:>6.3} {:>9.5} {:>8.4} {:>8.5} {:>8.5} {:>6.3} {:>5.2}-{:<5.2} {:>6.3}",
            l.span,
            l.radius,
            l.leading_edge_angle,
            l.max_camber,
            l.max_thickness,
            l.camber_shape,
            l.plateau[0],
            l.plateau[1],
            l.thickness_steepness
        );
    }
}

pub fn run(input: &Path, spans: &[f64], cli: &Cli) -> Result<()> {
    let params = BladeParameters::load(input)
        .with_context(|| format!("Failed to load blade parameters from {:?}", input))?;
    let interp = SpanInterpolator::new(&params);

    let layers = interp
        .spans()
        .map(|span| interp.profile(span).map(|p| LayerInfo::from(&p)))
        .collect::<Result<Vec<_>, _>>()?;
    let resolved = spans
        .iter()
        .map(|&span| interp.profile(span).map(|p| LayerInfo::from(&p)))
        .collect::<Result<Vec<_>, _>>()?;

    let info = BladeInfo {
        path: input.display().to_string(),
        angular_span: params.angular_span(),
        height: params.height(),
        hub_radius: params.hub_radius(),
        shroud_radius: params.shroud_radius(),
        z0: params.z0(),
        parameter_count: params.parameter_count(),
        layers,
        resolved,
    };

    match cli.format {
        OutputFormat::Json => output::print(&info, cli.format, cli.quiet),
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Blade Parameters".bold().underline());
                println!("  {}: {}", "File".cyan(), input.display());
                println!("  {}: {:.6} rad", "Angular span".cyan(), info.angular_span);
                println!("  {}: {:.6}", "Height".cyan(), info.height);
                println!(
                    "  {}: {:.6} to {:.6}",
                    "Radius".cyan(),
                    info.hub_radius,
                    info.shroud_radius
                );
                println!("  {}: {:.6}", "Axial datum".cyan(), info.z0);
                println!("  {}: {}", "Parameters".cyan(), info.parameter_count);

                print_layer_table("Layers:", &info.layers);
                if !info.resolved.is_empty() {
                    print_layer_table("Interpolated:", &info.resolved);
                }
            }
        }
    }

    Ok(())
}
