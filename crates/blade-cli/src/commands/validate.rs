//! blade validate command - check a blade record or a mesh file.

use std::path::Path;

use anyhow::{Context, Result};
use blade_geom::{BladeBuilder, BladeParameters, RecordFormat};
use blade_mesh::{Mesh, MeshReport, collect_issues};
use colored::Colorize;
use serde::Serialize;

use crate::{Cli, OutputFormat, SamplingArgs, output};

#[derive(Serialize)]
struct ValidationResult {
    path: String,
    kind: &'static str,
    valid: bool,
    issues: Vec<IssueInfo>,
    vertices: usize,
    faces: usize,
    signed_volume: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<DetailInfo>,
}

/// One offending face or edge.
#[derive(Serialize)]
struct DetailInfo {
    code: &'static str,
    message: String,
}

/// Individual offenders listed under the summary.
const MAX_DETAILS: usize = 20;

#[derive(Serialize)]
struct IssueInfo {
    category: String,
    message: String,
    severity: String,
}

impl IssueInfo {
    fn new(category: &str, message: String, severity: &str) -> Self {
        Self {
            category: category.to_string(),
            message,
            severity: severity.to_string(),
        }
    }
}

fn mesh_issues(report: &MeshReport) -> Vec<IssueInfo> {
    let mut issues = Vec::new();

    if !report.is_watertight {
        issues.push(IssueInfo::new(
            "topology",
            format!(
                "Mesh is not watertight ({} boundary edges)",
                report.boundary_edge_count
            ),
            "error",
        ));
    }
    if !report.is_manifold {
        issues.push(IssueInfo::new(
            "topology",
            format!(
                "Mesh is not manifold ({} non-manifold edges)",
                report.non_manifold_edge_count
            ),
            "error",
        ));
    }
    if !report.is_consistently_wound {
        issues.push(IssueInfo::new(
            "winding",
            format!(
                "{} edges traversed in the same direction by both faces",
                report.inconsistent_edge_count
            ),
            "error",
        ));
    }
    if report.degenerate_face_count > 0 {
        issues.push(IssueInfo::new(
            "geometry",
            format!("{} collapsed faces", report.degenerate_face_count),
            "error",
        ));
    }
    if report.is_inside_out {
        issues.push(IssueInfo::new(
            "winding",
            "Mesh appears to be inside-out".to_string(),
            "warning",
        ));
    }

    issues
}

/// Sample and cap a record with the requested grid.
fn load_record_mesh(input: &Path, sampling: &SamplingArgs) -> Result<Mesh> {
    let params = BladeParameters::load(input)
        .with_context(|| format!("Failed to load blade parameters from {:?}", input))?;
    let built = BladeBuilder::new(&params).sampling(sampling.config()).build()?;
    Ok(built.solid.into_mesh())
}

pub fn run(input: &Path, sampling: &SamplingArgs, cli: &Cli) -> Result<()> {
    let is_record = RecordFormat::from_path(input).is_ok();

    let mesh = if is_record {
        load_record_mesh(input, sampling)?
    } else {
        Mesh::load(input).with_context(|| format!("Failed to load mesh from {:?}", input))?
    };
    let report = mesh.validate();
    let issues = mesh_issues(&report);
    let details = collect_issues(&mesh, MAX_DETAILS)
        .into_iter()
        .map(|issue| DetailInfo {
            code: issue.code(),
            message: issue.to_string(),
        })
        .collect();

    let result = ValidationResult {
        path: input.display().to_string(),
        kind: if is_record { "blade" } else { "mesh" },
        valid: issues.iter().all(|i| i.severity != "error"),
        issues,
        vertices: report.vertex_count,
        faces: report.face_count,
        signed_volume: report.signed_volume,
        details,
    };

    match cli.format {
        OutputFormat::Json => output::print(&result, cli.format, cli.quiet),
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Validation Report".bold().underline());
                println!("  {}: {} ({})", "File".cyan(), input.display(), result.kind);

                if result.valid {
                    println!("  {}: {}", "Status".cyan(), "Valid".green().bold());
                } else {
                    println!("  {}: {}", "Status".cyan(), "Issues found".red().bold());
                }
                println!(
                    "  {}: {} vertices, {} faces",
                    "Size".cyan(),
                    result.vertices,
                    result.faces
                );
                println!("  {}: {:.6e}", "Signed volume".cyan(), result.signed_volume);
                println!(
                    "  {}: {}",
                    "Closed solid".cyan(),
                    output::yes_no(report.is_closed_solid())
                );

                if !result.issues.is_empty() {
                    println!("\n{}", "Issues:".bold());
                    for issue in &result.issues {
                        let icon = match issue.severity.as_str() {
                            "error" => "✗".red(),
                            "warning" => "⚠".yellow(),
                            _ => "ℹ".blue(),
                        };
                        println!("  {} [{}] {}", icon, issue.category, issue.message);
                    }
                }

                if !result.details.is_empty() {
                    println!("\n{}", "Details:".bold());
                    for detail in &result.details {
                        println!("  {} {}", detail.code.dimmed(), detail.message);
                    }
                }
            }
        }
    }

    if !result.valid {
        std::process::exit(1);
    }

    Ok(())
}
