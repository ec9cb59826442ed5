use rand::Rng;

use super::error::IsingError;
use super::lattice::{Lattice, Site};

/// Immutable parameters of one Metropolis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsingParams {
    /// Interaction strength J (positive is ferromagnetic)
    pub coupling: f64,
    /// External field H
    pub field: f64,
    /// Inverse temperature β = 1/(k_B T)
    pub beta: f64,
}

impl IsingParams {
    pub fn new(coupling: f64, field: f64, beta: f64) -> Self {
        Self {
            coupling,
            field,
            beta,
        }
    }

    pub fn with_beta(self, beta: f64) -> Self {
        Self { beta, ..self }
    }

    /// J and H must be finite. β may be any value but NaN; `±inf` are the
    /// strict-descent and strict-ascent limits.
    pub fn validate(&self) -> Result<(), IsingError> {
        if !self.coupling.is_finite() {
            return Err(IsingError::range(format!(
                "coupling must be finite, got {}",
                self.coupling
            )));
        }
        if !self.field.is_finite() {
            return Err(IsingError::range(format!(
                "field must be finite, got {}",
                self.field
            )));
        }
        if self.beta.is_nan() {
            return Err(IsingError::range("beta must not be NaN"));
        }
        Ok(())
    }
}

/// ΔE of flipping `site`, from the local energy before and after.
pub fn flip_energy_change(lattice: &Lattice, site: Site, params: &IsingParams) -> f64 {
    let current = lattice.get(site.row, site.col);
    let proposed = current.flipped();

    let e_before = lattice.local_energy(site.row, site.col, current, params.coupling, params.field);
    let e_after = lattice.local_energy(site.row, site.col, proposed, params.coupling, params.field);

    e_after - e_before
}

/// `min(1, exp(-β ΔE))`.
pub fn acceptance_probability(delta_e: f64, beta: f64) -> f64 {
    if delta_e <= 0.0 {
        return 1.0;
    }
    (-beta * delta_e).exp().min(1.0)
}

/// Metropolis decision for a uniform draw `r` in `[0, 1)`.
///
/// Non-positive ΔE is always accepted; this also covers `β = inf, ΔE = 0`
/// where `β ΔE` would be NaN. Otherwise an `exp` that overflows to `inf`
/// accepts and one that underflows to `0` rejects.
#[inline]
pub fn accepts(delta_e: f64, beta: f64, r: f64) -> bool {
    delta_e <= 0.0 || r < (-beta * delta_e).exp()
}

/// One Metropolis step at `site`. Returns whether the flip was applied.
///
/// Exactly one uniform number is drawn per call, accepted or not.
pub fn try_flip<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    site: Site,
    params: &IsingParams,
    rng: &mut R,
) -> bool {
    let delta_e = flip_energy_change(lattice, site, params);
    let r: f64 = rng.gen();

    if accepts(delta_e, params.beta, r) {
        let proposed = lattice.get(site.row, site.col).flipped();
        lattice.set(site.row, site.col, proposed);
        true
    } else {
        false
    }
}
