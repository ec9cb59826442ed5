use rand::Rng;
use std::time::{Duration, Instant};
use tracing::debug;

use super::error::IsingError;
use super::lattice::Lattice;
use super::metropolis::IsingParams;
use super::sampler::{run, Sample, SitePolicy};

/// Running mean of a scalar observable.
///
/// Keeps `(count, cumulative sum)` with Neumaier compensation so the mean
/// stays accurate over 10^7 and more updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningMean {
    count: u64,
    sum: f64,
    compensation: f64,
}

impl RunningMean {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one value and return the mean so far.
    pub fn update(&mut self, value: f64) -> f64 {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
        self.count += 1;
        self.current()
    }

    #[inline]
    fn current(&self) -> f64 {
        (self.sum + self.compensation) / self.count as f64
    }

    /// `None` before the first update.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.current())
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Output of a single equilibration run.
#[derive(Debug, Clone)]
pub struct EquilibrationTrace {
    /// Running mean of `|m|` after every iteration, initial configuration first
    pub running_mean: Vec<f64>,
    /// Number of accepted flips
    pub accepted: usize,
    /// Wall time spent in the chain
    pub elapsed: Duration,
}

impl EquilibrationTrace {
    pub fn iterations(&self) -> usize {
        self.running_mean.len().saturating_sub(1)
    }

    pub fn final_mean(&self) -> f64 {
        self.running_mean.last().copied().unwrap_or(0.0)
    }

    pub fn acceptance_rate(&self) -> f64 {
        match self.iterations() {
            0 => 0.0,
            n => self.accepted as f64 / n as f64,
        }
    }
}

/// Run `iterations` Metropolis steps and record the running mean of `|m|`.
pub fn equilibrate<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    params: IsingParams,
    iterations: usize,
    policy: SitePolicy,
    rng: &mut R,
) -> Result<EquilibrationTrace, IsingError> {
    let selector = policy.selector(lattice.side());
    let chain = run(lattice, params, iterations, selector, rng)?;

    debug!(
        "Equilibrating {}x{} lattice: beta={}, J={}, H={}, {} iterations ({})",
        chain.lattice().side(),
        chain.lattice().side(),
        params.beta,
        params.coupling,
        params.field,
        iterations,
        policy
    );

    let start = Instant::now();
    let mut mean = RunningMean::new();
    let mut running_mean = Vec::with_capacity(iterations + 1);
    let mut accepted = 0;

    for sample in chain {
        if sample.accepted {
            accepted += 1;
        }
        running_mean.push(mean.update(sample.magnetization));
    }

    Ok(EquilibrationTrace {
        running_mean,
        accepted,
        elapsed: start.elapsed(),
    })
}

/// Equal-weight mean of `|m|` over every sample of a chain.
pub fn time_averaged_magnetization(samples: impl Iterator<Item = Sample>) -> f64 {
    let mut mean = RunningMean::new();
    for sample in samples {
        mean.update(sample.magnetization);
    }
    mean.mean().unwrap_or(0.0)
}
