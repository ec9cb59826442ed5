use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::error::IsingError;
use super::lattice::{site_count, Lattice};
use super::metropolis::IsingParams;
use super::observables::time_averaged_magnetization;
use super::sampler::{run, seeded_rng, SitePolicy};

/// `points` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, points: usize) -> Result<Vec<f64>, IsingError> {
    match points {
        0 => Err(IsingError::range("linspace needs at least one point")),
        1 => Ok(vec![start]),
        _ => {
            let step = (end - start) / (points - 1) as f64;
            Ok((0..points)
                .map(|i| {
                    if i == points - 1 {
                        end
                    } else {
                        start + i as f64 * step
                    }
                })
                .collect())
        }
    }
}

/// Time-averaged `|m|` at one inverse temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhasePoint {
    pub beta: f64,
    pub magnetization: f64,
}

/// Magnetization against β: a fresh random lattice and an independent
/// chain for every β value.
#[derive(Debug, Clone)]
pub struct PhaseSweep {
    pub side: usize,
    pub coupling: f64,
    pub field: f64,
    pub iterations: usize,
    pub policy: SitePolicy,
    /// Base seed; the chain at index `i` is seeded with `seed + i`
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl PhaseSweep {
    pub fn new(side: usize, coupling: f64, field: f64, iterations: usize) -> Self {
        Self {
            side,
            coupling,
            field,
            iterations,
            policy: SitePolicy::WithReplacement,
            seed: None,
            parallel: true,
        }
    }

    /// One `PhasePoint` per β, in the order given.
    pub fn run(&self, betas: &[f64]) -> Result<Vec<PhasePoint>, IsingError> {
        if betas.is_empty() {
            return Err(IsingError::range("phase diagram needs at least one beta"));
        }
        site_count(self.side)?;
        for &beta in betas {
            IsingParams::new(self.coupling, self.field, beta).validate()?;
        }

        if self.parallel {
            betas
                .par_iter()
                .enumerate()
                .map(|(index, &beta)| self.point(index, beta))
                .collect()
        } else {
            betas
                .iter()
                .enumerate()
                .map(|(index, &beta)| self.point(index, beta))
                .collect()
        }
    }

    fn point(&self, index: usize, beta: f64) -> Result<PhasePoint, IsingError> {
        let mut rng = seeded_rng(self.seed.map(|s| s.wrapping_add(index as u64)));
        let mut lattice = Lattice::random(self.side, &mut rng)?;
        let params = IsingParams::new(self.coupling, self.field, beta);
        let selector = self.policy.selector(self.side);

        let chain = run(&mut lattice, params, self.iterations, selector, &mut rng)?;
        let magnetization = time_averaged_magnetization(chain);

        debug!("beta = {:.4}: <|m|> = {:.6}", beta, magnetization);
        Ok(PhasePoint {
            beta,
            magnetization,
        })
    }
}
