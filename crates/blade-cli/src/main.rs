//! blade-cli: Command-line interface for blade and pump geometry generation.
//!
//! Turns blade parameter records (JSON or TOML) into triangulated blades and
//! full pump assemblies, suitable for scripting CFD preprocessing runs.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=blade_geom=info` - Basic operation logging
//! - `RUST_LOG=blade_geom=debug` - Detailed sampling and assembly logging
//! - `RUST_LOG=blade_mesh::timing=debug` - Performance timing
//! - `RUST_LOG=debug` - All debug output
//!
//! # Example
//!
//! ```bash
//! # Write a starting parameter file, then mesh it
//! blade template rotor.json
//! RUST_LOG=blade_geom=info blade generate rotor.json -o rotor_blade.stl
//!
//! # Rotor and vane rows with diffusers, one VTK file per group
//! blade pump rotor.json --vane vane.json --layout pump.toml -o out --mesh-format vtk
//! ```

use std::path::PathBuf;

use anyhow::Result;
use blade_geom::{BladeError, ChordDistribution};
use blade_mesh::{MeshError, MeshFormat};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{generate, info, pump, template, validate};

/// blade - Parametric pump blade and pump assembly generator.
///
/// Sample, triangulate and export blades described by five spanwise layers.
#[derive(Parser)]
#[command(name = "blade")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

/// Chord station spacing.
#[derive(Clone, Copy, ValueEnum)]
pub enum Distribution {
    /// Evenly spaced stations
    Uniform,
    /// Stations clustered at leading and trailing edges
    Cosine,
}

impl From<Distribution> for ChordDistribution {
    fn from(value: Distribution) -> Self {
        match value {
            Distribution::Uniform => ChordDistribution::Uniform,
            Distribution::Cosine => ChordDistribution::Cosine,
        }
    }
}

/// Mesh file format for pump export.
#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Binary STL
    Stl,
    /// Wavefront OBJ
    Obj,
    /// Legacy VTK polydata
    Vtk,
}

impl From<ExportFormat> for MeshFormat {
    fn from(value: ExportFormat) -> Self {
        match value {
            ExportFormat::Stl => MeshFormat::Stl,
            ExportFormat::Obj => MeshFormat::Obj,
            ExportFormat::Vtk => MeshFormat::Vtk,
        }
    }
}

/// Sampling options shared by every command that samples a blade.
#[derive(Args, Clone, Copy)]
pub struct SamplingArgs {
    /// Span rows per blade (at least 5)
    #[arg(long, default_value = "9")]
    span_samples: usize,

    /// Chord stations per row (at least 3)
    #[arg(long, default_value = "64")]
    chord_samples: usize,

    /// Chord station spacing
    #[arg(long, default_value = "uniform")]
    distribution: Distribution,
}

impl SamplingArgs {
    pub fn config(&self) -> blade_geom::SamplingConfig {
        blade_geom::SamplingConfig::new(self.span_samples, self.chord_samples)
            .with_distribution(self.distribution.into())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Sample and triangulate one blade
    Generate {
        /// Blade parameter file (.json or .toml)
        input: PathBuf,

        /// Output mesh path (format determined by extension)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        sampling: SamplingArgs,

        /// Leave root and tip open instead of capping them
        #[arg(long)]
        shell: bool,
    },

    /// Show parameters and interpolated layers of a blade record
    Info {
        /// Blade parameter file (.json or .toml)
        input: PathBuf,

        /// Also resolve the layer at these span positions (0 to 1)
        #[arg(long = "span", value_name = "R")]
        spans: Vec<f64>,
    },

    /// Validate a blade record or a mesh file
    Validate {
        /// Blade parameter file (.json, .toml) or mesh file (.stl)
        input: PathBuf,

        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Assemble a pump and write one mesh per group
    Pump {
        /// Rotor blade parameter file
        rotor: PathBuf,

        /// Vane blade parameter file; omit for a rotor-only pump
        #[arg(long)]
        vane: Option<PathBuf>,

        /// Pump layout file (.toml or .json); defaults when omitted
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Mesh format of the written files
        #[arg(long, default_value = "stl")]
        mesh_format: ExportFormat,

        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Write a starting blade record or pump layout
    Template {
        /// Output path (.json or .toml)
        output: PathBuf,

        /// Write the default pump layout instead of a blade record
        #[arg(long)]
        layout: bool,
    },
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "blade_geom=info,blade_mesh=info",
            2 => "blade_geom=debug,blade_mesh=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn report_mesh_error(err: &MeshError) {
    eprintln!("  {}: {}", "Code".cyan(), err.code());
    eprintln!("  {}: {}", "Suggestion".green(), err.recovery_suggestion());
    if let Some(location) = err.location() {
        eprintln!("  {}: {}", "Location".yellow(), location);
    }
}

fn report_error(e: &anyhow::Error) {
    if let Some(blade_err) = e.downcast_ref::<BladeError>() {
        eprintln!("{}: {}", "Error".red().bold(), e);
        eprintln!("  {}: {}", "Code".cyan(), blade_err.code());
        eprintln!(
            "  {}: {}",
            "Suggestion".green(),
            blade_err.recovery_suggestion()
        );
        if let BladeError::Mesh(mesh_err) = blade_err
            && let Some(location) = mesh_err.location()
        {
            eprintln!("  {}: {}", "Location".yellow(), location);
        }
    } else if let Some(mesh_err) = e.downcast_ref::<MeshError>() {
        eprintln!("{}: {}", "Error".red().bold(), e);
        report_mesh_error(mesh_err);
    } else {
        eprintln!("{}: {}", "Error".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {}: {}", "Caused by".yellow(), cause);
        }
    }
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Generate {
            input,
            output,
            sampling,
            shell,
        } => generate::run(input, output, sampling, *shell, &cli),
        Commands::Info { input, spans } => info::run(input, spans, &cli),
        Commands::Validate { input, sampling } => validate::run(input, sampling, &cli),
        Commands::Pump {
            rotor,
            vane,
            layout,
            output,
            mesh_format,
            sampling,
        } => pump::run(
            rotor,
            vane.as_deref(),
            layout.as_deref(),
            output,
            *mesh_format,
            sampling,
            &cli,
        ),
        Commands::Template { output, layout } => template::run(output, *layout, &cli),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            report_error(e);
        }
        std::process::exit(1);
    }

    Ok(())
}
