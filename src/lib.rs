//! Metropolis Monte Carlo for the two-dimensional Ising model
//!
//! The simulation core lives in [`ising`]; [`config`], [`io`] and [`app`]
//! turn it into the `ising` command-line program.

pub mod app;
pub mod config;
pub mod io;
pub mod ising;

pub use ising::{IsingError, IsingParams, Lattice, PhasePoint, PhaseSweep, SitePolicy, Spin};
