use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Permeate Developers",
    version,
    about = "Permeate CLI - Simulate ion transport across a reverse-osmosis nanotube membrane and estimate permeate water quality.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the particle simulation and report membrane statistics.
    Simulate(SimulateArgs),
    /// Compute closed-form water-quality statistics without simulating particles.
    Stats(StatsArgs),
    /// List the ion species table.
    Species,
}

/// Operating-point arguments shared by every command that needs a configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct OperatingPointArgs {
    /// Path to a configuration file in TOML format. Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the feed pressure in PSI (100-1000).
    #[arg(short = 'P', long, value_name = "PSI")]
    pub pressure: Option<f64>,

    /// Override the nanotube pore diameter in nanometers (0.5-5.0).
    #[arg(short = 'd', long, value_name = "NM")]
    pub pore_diameter: Option<f64>,

    /// Override a solute concentration. Can be used multiple times. Example: --solute Mg=120
    #[arg(long = "solute", value_name = "ION=PPM")]
    pub solutes: Vec<String>,

    /// Evaluate with the system idle (unpressurized) instead of running.
    #[arg(long)]
    pub idle: bool,

    /// Write a TOML statistics report to this path.
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S membrane.pressure=750
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `simulate` subcommand.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub point: OperatingPointArgs,

    // --- Simulation Overrides ---
    /// Override the number of ticks to simulate.
    #[arg(short, long, value_name = "INT")]
    pub ticks: Option<u64>,

    /// Override how often (in ticks) a frame is recorded.
    #[arg(long, value_name = "INT")]
    pub frame_interval: Option<u64>,

    /// Seed the random source for a reproducible run.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Override the domain width.
    #[arg(long, value_name = "FLOAT")]
    pub width: Option<f64>,

    /// Override the domain height.
    #[arg(long, value_name = "FLOAT")]
    pub height: Option<f64>,

    /// Write recorded frames as CSV to this path.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub point: OperatingPointArgs,
}
