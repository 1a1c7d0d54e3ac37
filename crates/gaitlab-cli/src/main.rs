//! gaitlab CLI - leg workspace and gait analysis
//!
//! Reads leg architectures from JSON, runs the analysis pipeline and prints
//! the results as JSON.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gaitlab::{
    analyze, ActuatorAngles, AnalysisSettings, LegCatalog, Validity, WorkspaceSettings,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "gaitlab")]
#[command(about = "Workspace and gait-envelope analysis for two-DOF legs", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CatalogArgs {
    /// Architecture catalog JSON (defaults to the built-in presets)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Optimized override JSON keyed by architecture name
    #[arg(long)]
    overrides: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available architectures
    List {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Forward kinematics for one angle pair
    Fk {
        /// Architecture name
        architecture: String,
        /// Actuator 1 angle, degrees
        #[arg(allow_negative_numbers = true)]
        theta1: f64,
        /// Actuator 2 angle, degrees
        #[arg(allow_negative_numbers = true)]
        theta2: f64,
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Sample the workspace, extract its boundary and fit the gait ellipse
    Analyze {
        /// Architecture name
        architecture: String,
        /// Samples per actuator axis (overrides the settings file)
        #[arg(short, long)]
        resolution: Option<usize>,
        /// Analysis settings JSON
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Include the raw point cloud in the output
        #[arg(long)]
        points: bool,
        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::List { catalog } => list(&load_catalog(&catalog)?),
        Commands::Fk {
            architecture,
            theta1,
            theta2,
            catalog,
        } => forward(&load_catalog(&catalog)?, &architecture, theta1, theta2),
        Commands::Analyze {
            architecture,
            resolution,
            settings,
            points,
            catalog,
        } => {
            let mut settings = match settings {
                Some(path) => read_json::<AnalysisSettings>(&path)?,
                None => AnalysisSettings::default(),
            };
            if let Some(resolution) = resolution {
                settings.workspace = WorkspaceSettings {
                    resolution,
                    ..settings.workspace
                };
            }
            run_analysis(&load_catalog(&catalog)?, &architecture, &settings, points)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_catalog(args: &CatalogArgs) -> Result<LegCatalog> {
    let mut catalog = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading architecture catalog");
            read_json::<LegCatalog>(path)?
        }
        None => LegCatalog::presets(),
    };
    if let Some(path) = &args.overrides {
        let overrides = read_json(path)?;
        catalog.apply_overrides(&overrides);
    }
    Ok(catalog)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct ListEntry<'a> {
    name: &'a str,
    #[serde(flatten)]
    params: &'a gaitlab::LegParams,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn list(catalog: &LegCatalog) -> Result<()> {
    let entries: Vec<ListEntry> = catalog
        .names()
        .filter_map(|name| {
            let params = catalog.get(name)?;
            let error = catalog.geometry(name).err().map(|e| e.to_string());
            Some(ListEntry {
                name,
                params,
                valid: error.is_none(),
                error,
            })
        })
        .collect();
    print_json(&entries)
}

#[derive(Serialize)]
struct FkOutput {
    angles: ActuatorAngles,
    validity: Validity,
    #[serde(skip_serializing_if = "Option::is_none")]
    foot: Option<[f64; 2]>,
    links: Vec<[[f64; 2]; 2]>,
}

fn forward(catalog: &LegCatalog, architecture: &str, theta1: f64, theta2: f64) -> Result<()> {
    let leg = catalog.geometry(architecture)?;
    let angles = ActuatorAngles::new(theta1, theta2);
    let pose = leg.forward_kinematics(angles);
    let links = leg
        .joints(angles)
        .map(|j| {
            j.links()
                .into_iter()
                .map(|(p, q)| [[p.x, p.y], [q.x, q.y]])
                .collect()
        })
        .unwrap_or_default();
    print_json(&FkOutput {
        angles,
        validity: pose.validity(),
        foot: pose.position().map(|p| [p.x, p.y]),
        links,
    })
}

fn run_analysis(
    catalog: &LegCatalog,
    architecture: &str,
    settings: &AnalysisSettings,
    include_points: bool,
) -> Result<()> {
    let leg = catalog.geometry(architecture)?;
    let analysis = analyze(&leg, settings)?;
    print_json(&analysis.report(include_points))
}
