//! Configuration management for Ising runs
//!
//! This module handles the YAML run description, its defaults, and the
//! validation that turns raw (signed) inputs into checked run parameters.

mod args;

pub use args::Args;

use crate::ising::{linspace, site_count, IsingError, IsingParams, SitePolicy};
use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Sweeps per run when neither `iterations` nor `sweeps` is given
const DEFAULT_SWEEPS: i64 = 1000;
/// Equilibration inverse temperature
pub const DEFAULT_BETA: f64 = 0.2;
const DEFAULT_BETA_MIN: f64 = 0.1;
const DEFAULT_BETA_MAX: f64 = 4.0;
const DEFAULT_POINTS: i64 = 50;

/// Main configuration structure for an Ising run
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub lattice: LatticeParams,
    pub coupling: Option<f64>,
    pub field: Option<f64>,
    pub seed: Option<u64>,
    pub equilibration: Option<EquilibrationParams>,
    pub phase_diagram: Option<PhaseDiagramParams>,
    pub output: Option<OutputParams>,
}

/// Lattice geometry; sizes are signed so that bad input is reported, not rejected by the parser
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LatticeParams {
    pub size: i64,
}

/// Single-temperature equilibration run
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EquilibrationParams {
    pub enabled: Option<bool>,
    pub beta: Option<f64>,
    pub iterations: Option<i64>,
    pub sweeps: Option<i64>,
    pub site_policy: Option<SitePolicy>,
}

impl Default for EquilibrationParams {
    fn default() -> Self {
        EquilibrationParams {
            enabled: Some(true),
            beta: Some(DEFAULT_BETA),
            iterations: None,
            sweeps: Some(DEFAULT_SWEEPS),
            site_policy: Some(SitePolicy::WithReplacement),
        }
    }
}

impl EquilibrationParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.enabled.is_none() {
            self.enabled = defaults.enabled;
        }
        if self.beta.is_none() {
            self.beta = defaults.beta;
        }
        if self.iterations.is_none() && self.sweeps.is_none() {
            self.sweeps = defaults.sweeps;
        }
        if self.site_policy.is_none() {
            self.site_policy = defaults.site_policy;
        }
        self
    }
}

/// Magnetization against β over a linear grid
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PhaseDiagramParams {
    pub enabled: Option<bool>,
    pub beta_min: Option<f64>,
    pub beta_max: Option<f64>,
    pub points: Option<i64>,
    pub iterations: Option<i64>,
    pub sweeps: Option<i64>,
    pub site_policy: Option<SitePolicy>,
    pub parallel: Option<bool>,
}

impl Default for PhaseDiagramParams {
    fn default() -> Self {
        PhaseDiagramParams {
            enabled: Some(true),
            beta_min: Some(DEFAULT_BETA_MIN),
            beta_max: Some(DEFAULT_BETA_MAX),
            points: Some(DEFAULT_POINTS),
            iterations: None,
            sweeps: Some(DEFAULT_SWEEPS),
            site_policy: Some(SitePolicy::WithReplacement),
            parallel: Some(true),
        }
    }
}

impl PhaseDiagramParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.enabled.is_none() {
            self.enabled = defaults.enabled;
        }
        if self.beta_min.is_none() {
            self.beta_min = defaults.beta_min;
        }
        if self.beta_max.is_none() {
            self.beta_max = defaults.beta_max;
        }
        if self.points.is_none() {
            self.points = defaults.points;
        }
        if self.iterations.is_none() && self.sweeps.is_none() {
            self.sweeps = defaults.sweeps;
        }
        if self.site_policy.is_none() {
            self.site_policy = defaults.site_policy;
        }
        if self.parallel.is_none() {
            self.parallel = defaults.parallel;
        }
        self
    }

    /// The β grid, `linspace(beta_min, beta_max, points)`
    pub fn betas(&self) -> Result<Vec<f64>, IsingError> {
        let points = self.points.unwrap_or(DEFAULT_POINTS);
        let points = usize::try_from(points).map_err(|_| {
            IsingError::InvalidParameterRange(format!(
                "phase diagram needs a non-negative number of points, got {points}"
            ))
        })?;
        linspace(
            self.beta_min.unwrap_or(DEFAULT_BETA_MIN),
            self.beta_max.unwrap_or(DEFAULT_BETA_MAX),
            points,
        )
    }
}

/// CSV files handed to the plotting side
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OutputParams {
    pub trace_csv: Option<String>,
    pub phase_csv: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file, with defaults applied
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Unable to read configuration file: {}", path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config = serde_yml::from_str::<Config>(content)
            .wrap_err("Failed to parse configuration file")?
            .with_defaults();
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yml::to_string(self).wrap_err("Failed to serialize configuration")?;
        fs::write(path, content).wrap_err("Failed to write configuration file")?;
        Ok(())
    }

    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        if self.coupling.is_none() {
            self.coupling = Some(1.0);
        }
        if self.field.is_none() {
            self.field = Some(0.0);
        }
        self.equilibration = self.equilibration.map(EquilibrationParams::with_defaults);
        self.phase_diagram = self.phase_diagram.map(PhaseDiagramParams::with_defaults);
        self
    }

    /// Lattice side N, checked to be at least 1 with N² sites addressable
    pub fn lattice_side(&self) -> Result<usize, IsingError> {
        let invalid = || IsingError::InvalidSize(self.lattice.size);
        let side = usize::try_from(self.lattice.size).map_err(|_| invalid())?;
        site_count(side).map_err(|_| invalid())?;
        Ok(side)
    }

    pub fn coupling(&self) -> f64 {
        self.coupling.unwrap_or(1.0)
    }

    pub fn field(&self) -> f64 {
        self.field.unwrap_or(0.0)
    }

    pub fn params(&self, beta: f64) -> IsingParams {
        IsingParams::new(self.coupling(), self.field(), beta)
    }

    /// Check if the equilibration run is enabled
    pub fn is_equilibration_enabled(&self) -> bool {
        self.equilibration
            .as_ref()
            .and_then(|e| e.enabled)
            .unwrap_or(false)
    }

    /// Check if the phase-diagram sweep is enabled
    pub fn is_phase_diagram_enabled(&self) -> bool {
        self.phase_diagram
            .as_ref()
            .and_then(|p| p.enabled)
            .unwrap_or(false)
    }

    pub fn trace_csv(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.trace_csv.as_deref())
    }

    pub fn phase_csv(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.phase_csv.as_deref())
    }
}

/// Number of Metropolis steps: `iterations` when given, else `sweeps * N²`.
pub fn resolve_iterations(
    iterations: Option<i64>,
    sweeps: Option<i64>,
    side: usize,
) -> Result<usize, IsingError> {
    if let Some(n) = iterations {
        return usize::try_from(n).map_err(|_| IsingError::InvalidIterationCount(n));
    }

    let sweeps = sweeps.unwrap_or(DEFAULT_SWEEPS);
    let count = usize::try_from(sweeps).map_err(|_| IsingError::InvalidIterationCount(sweeps))?;
    count.checked_mul(site_count(side)?).ok_or_else(|| {
        IsingError::InvalidParameterRange(format!(
            "{sweeps} sweeps of a {side}x{side} lattice overflow the iteration counter"
        ))
    })
}
