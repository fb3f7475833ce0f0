//! Delivery Planner - Command Line Interface
//!
//! Computes a nearest-neighbour delivery tour from a scenario file.

use clap::{Parser, Subcommand, ValueEnum};
use delivery_planner::error::Result;
use delivery_planner::event::Point;
use delivery_planner::route::Route;
use delivery_planner::scenario::{write_route_csv, Scenario};

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "delivery-planner")]
#[command(version = "1.0")]
#[command(about = "Plans a delivery tour visiting every delivery point and one pickup point")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a route for a scenario file
    Plan {
        /// Scenario file (.json, otherwise CSV rows of kind,x,y)
        #[arg(short, long)]
        input: PathBuf,

        /// Override the depot x coordinate
        #[arg(long, requires = "depot_y", allow_negative_numbers = true)]
        depot_x: Option<f64>,

        /// Override the depot y coordinate
        #[arg(long, requires = "depot_x", allow_negative_numbers = true)]
        depot_y: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate a random scenario
    Random {
        /// Number of delivery points
        #[arg(short, long, default_value = "10")]
        deliveries: usize,

        /// Number of pickup points
        #[arg(short, long, default_value = "3")]
        pickups: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Points are drawn from [-extent, extent] on both axes
        #[arg(short, long, default_value = "100")]
        extent: f64,

        /// Save the scenario (.json, otherwise CSV)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also plan and print a route for the generated scenario
        #[arg(long)]
        plan: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum OutputFormat {
    /// Human readable summary
    Text,
    /// Route as JSON
    Json,
    /// One CSV row per route step
    Csv,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Plan { verbose, .. } | Commands::Random { verbose, .. } => *verbose,
    };
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Plan { input, depot_x, depot_y, format, output, .. } => {
            let depot = depot_x.zip(depot_y).map(|(x, y)| Point::new(x, y));
            plan_scenario(&input, depot, format, output.as_deref())
        }
        Commands::Random { deliveries, pickups, seed, extent, output, plan, .. } => {
            random_scenario(deliveries, pickups, seed, extent, output.as_deref(), plan)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn plan_scenario(
    path: &Path,
    depot: Option<Point>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    log::info!("Loading scenario from {:?}...", path);
    let mut scenario = Scenario::from_file(path)?;
    if let Some(depot) = depot {
        scenario.depot = depot;
    }

    let mut planner = scenario.to_planner()?;
    let route = planner.compute_route()?;

    match output {
        Some(out_path) => {
            let file = File::create(out_path)?;
            write_route(route, format, file)?;
            log::info!("Route saved to {:?}", out_path);
        }
        None => write_route(route, format, io::stdout().lock())?,
    }
    Ok(())
}

fn random_scenario(
    deliveries: usize,
    pickups: usize,
    seed: u64,
    extent: f64,
    output: Option<&Path>,
    plan: bool,
) -> Result<()> {
    let scenario = Scenario::random(seed, deliveries, pickups, extent)?;
    log::info!(
        "Generated scenario with {} deliveries and {} pickups (seed {})",
        deliveries,
        pickups,
        seed
    );

    match output {
        Some(out_path) => {
            let file = File::create(out_path)?;
            let is_json = out_path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            if is_json {
                scenario.write_json(file)?;
            } else {
                scenario.write_csv(file)?;
            }
            log::info!("Scenario saved to {:?}", out_path);
        }
        None if !plan => scenario.write_csv(io::stdout().lock())?,
        None => {}
    }

    if plan {
        let mut planner = scenario.to_planner()?;
        let route = planner.compute_route()?;
        write_route(route, OutputFormat::Text, io::stdout().lock())?;
    }
    Ok(())
}

fn write_route<W: Write>(route: &Route, format: OutputFormat, mut out: W) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "========== Results ==========")?;
            write!(out, "{}", route)?;
            writeln!(out, "{}", route.legend(1))?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, route)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_route_csv(route, out)?,
    }
    Ok(())
}
