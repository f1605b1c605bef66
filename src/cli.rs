use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Boreas ensemble forecast recentering toolkit.
#[derive(Parser)]
#[command(
    name = "boreas",
    version,
    about = "Ensemble forecast recentering toolkit"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Recenter ensemble members around a deterministic center forecast.
    Recenter(RecenterArgs),
    /// Print a summary of a field dataset.
    Inspect(InspectArgs),
}

/// Arguments for the `recenter` subcommand.
#[derive(clap::Args)]
pub struct RecenterArgs {
    /// Path to the ensemble member field store.
    #[arg(short, long)]
    pub members: PathBuf,

    /// Path to the center (deterministic) field store.
    #[arg(short, long)]
    pub center: PathBuf,

    /// Path for the recentered output field store.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Override the clip variable set (comma-separated parameter names).
    #[arg(long, value_delimiter = ',')]
    pub clip: Option<Vec<String>>,
}

/// Arguments for the `inspect` subcommand.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Dataset name or path (names resolve through registered paths).
    #[arg(short, long)]
    pub dataset: String,

    /// Extra directories to search for the dataset name.
    #[arg(short, long)]
    pub path: Vec<PathBuf>,
}
