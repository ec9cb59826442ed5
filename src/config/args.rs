//! Command-line argument parsing for Ising runs

use clap::Parser;

/// Metropolis Monte Carlo for the 2D Ising model with YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the random seed (default: entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the equilibration inverse temperature
    #[arg(long)]
    pub beta: Option<f64>,

    /// Override the number of Metropolis steps for every run
    #[arg(long, allow_negative_numbers = true)]
    pub iterations: Option<i64>,

    /// Run the phase diagram on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Log per-beta progress
    #[arg(short, long)]
    pub verbose: bool,
}
