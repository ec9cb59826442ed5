//! Input/Output operations for Ising runs
//!
//! This module handles logging setup and the CSV files consumed by plotting.

mod output;

pub use output::{setup_output, write_phase_csv, write_trace_csv};
