use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::IsingError;
use super::lattice::{Lattice, Site};
use super::metropolis::{try_flip, IsingParams};

/// Random source of every chain. Xoshiro256** is fixed so that a seed
/// reproduces the same site and acceptance draws across platforms.
pub type IsingRng = Xoshiro256StarStar;

pub fn seeded_rng(seed: Option<u64>) -> IsingRng {
    match seed {
        Some(seed) => IsingRng::seed_from_u64(seed),
        None => IsingRng::from_entropy(),
    }
}

/// Strategy choosing which site the next Metropolis step proposes to flip.
pub trait SiteSelector {
    /// Side N of the lattice this selector draws sites for
    fn side(&self) -> usize;

    fn next_site<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Site;
}

/// Independent uniform draws; a site may repeat before others are visited.
#[derive(Debug, Clone)]
pub struct UniformSites {
    side: usize,
    sites: usize,
}

impl UniformSites {
    pub fn new(side: usize) -> Self {
        Self {
            side,
            sites: side.saturating_mul(side),
        }
    }
}

impl SiteSelector for UniformSites {
    fn side(&self) -> usize {
        self.side
    }

    #[inline]
    fn next_site<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Site {
        let z = rng.gen_range(0..self.sites);
        Site::from_linear(z, self.side)
    }
}

/// Sampling without replacement within a sweep.
///
/// The pool starts as the N² unique linear indices. Each draw picks a
/// uniform position in the remaining pool and removes it by index, so a
/// sweep is exactly one visit per site. An exhausted pool is refilled and
/// the next sweep starts.
#[derive(Debug, Clone)]
pub struct SweepSites {
    side: usize,
    sites: usize,
    pool: Vec<usize>,
}

impl SweepSites {
    pub fn new(side: usize) -> Self {
        let sites = side.saturating_mul(side);
        Self {
            side,
            sites,
            pool: (0..sites).collect(),
        }
    }

    /// Sites not yet visited in the current sweep.
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }
}

impl SiteSelector for SweepSites {
    fn side(&self) -> usize {
        self.side
    }

    fn next_site<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Site {
        if self.pool.is_empty() {
            self.pool.extend(0..self.sites);
        }
        let pick = rng.gen_range(0..self.pool.len());
        let z = self.pool.swap_remove(pick);
        Site::from_linear(z, self.side)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SitePolicy {
    #[default]
    WithReplacement,
    SweepWithoutReplacement,
}

impl SitePolicy {
    pub fn selector(self, side: usize) -> SiteSelection {
        match self {
            SitePolicy::WithReplacement => SiteSelection::Uniform(UniformSites::new(side)),
            SitePolicy::SweepWithoutReplacement => SiteSelection::Sweep(SweepSites::new(side)),
        }
    }
}

impl fmt::Display for SitePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SitePolicy::WithReplacement => write!(f, "with replacement"),
            SitePolicy::SweepWithoutReplacement => write!(f, "sweep without replacement"),
        }
    }
}

/// Either selector behind one type, chosen at runtime from a `SitePolicy`.
#[derive(Debug, Clone)]
pub enum SiteSelection {
    Uniform(UniformSites),
    Sweep(SweepSites),
}

impl SiteSelector for SiteSelection {
    fn side(&self) -> usize {
        match self {
            SiteSelection::Uniform(s) => s.side(),
            SiteSelection::Sweep(s) => s.side(),
        }
    }

    #[inline]
    fn next_site<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Site {
        match self {
            SiteSelection::Uniform(s) => s.next_site(rng),
            SiteSelection::Sweep(s) => s.next_site(rng),
        }
    }
}

/// State of the chain after one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// 0 for the initial configuration, then 1..=iterations
    pub step: usize,
    /// Proposed site; `None` for the initial configuration
    pub site: Option<Site>,
    pub accepted: bool,
    /// `|Σ s| / N²` after the step
    pub magnetization: f64,
}

/// Lazy Metropolis chain over a borrowed lattice.
///
/// Yields the initial configuration first, then one `Sample` per Metropolis
/// step, `iterations + 1` items in total. Stopping between items leaves the
/// lattice in a consistent state.
pub struct Chain<'a, S, R: ?Sized> {
    lattice: &'a mut Lattice,
    params: IsingParams,
    selector: S,
    rng: &'a mut R,
    iterations: usize,
    step: usize,
    started: bool,
}

/// Start a chain of `iterations` Metropolis steps on `lattice`.
///
/// The selector must draw from a lattice of the same side.
pub fn run<'a, S, R>(
    lattice: &'a mut Lattice,
    params: IsingParams,
    iterations: usize,
    selector: S,
    rng: &'a mut R,
) -> Result<Chain<'a, S, R>, IsingError>
where
    S: SiteSelector,
    R: Rng + ?Sized,
{
    params.validate()?;
    if selector.side() != lattice.side() {
        return Err(IsingError::range(format!(
            "site selector draws from a {0}x{0} lattice, chain runs on {1}x{1}",
            selector.side(),
            lattice.side()
        )));
    }
    Ok(Chain {
        lattice,
        params,
        selector,
        rng,
        iterations,
        step: 0,
        started: false,
    })
}

impl<'a, S, R: ?Sized> Chain<'a, S, R> {
    pub fn lattice(&self) -> &Lattice {
        &*self.lattice
    }

    pub fn params(&self) -> &IsingParams {
        &self.params
    }

    fn remaining(&self) -> usize {
        let pending = self.iterations - self.step;
        if self.started {
            pending
        } else {
            pending + 1
        }
    }
}

impl<'a, S, R> Iterator for Chain<'a, S, R>
where
    S: SiteSelector,
    R: Rng + ?Sized,
{
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if !self.started {
            self.started = true;
            return Some(Sample {
                step: 0,
                site: None,
                accepted: false,
                magnetization: self.lattice.magnetization(),
            });
        }
        if self.step == self.iterations {
            return None;
        }

        self.step += 1;
        let site = self.selector.next_site(&mut *self.rng);
        let accepted = try_flip(&mut *self.lattice, site, &self.params, &mut *self.rng);

        Some(Sample {
            step: self.step,
            site: Some(site),
            accepted,
            magnetization: self.lattice.magnetization(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<'a, S, R> ExactSizeIterator for Chain<'a, S, R>
where
    S: SiteSelector,
    R: Rng + ?Sized,
{
}
