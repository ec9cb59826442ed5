//! Ising Monte Carlo Command-Line Interface
//!
//! Runs an equilibration trace and a phase-diagram sweep described by a YAML configuration.

use color_eyre::eyre::Result;
use ising_mc::app::IsingApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    IsingApplication::from_cli()?.run()
}
