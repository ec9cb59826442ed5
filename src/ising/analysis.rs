//! Exact reference values for the square-lattice Ising model, in units where
//! J = k_B = 1.

use itertools::Itertools;

use super::phase::PhasePoint;

/// Onsager critical temperature T_c = 2 / ln(1 + √2) ≈ 2.269
pub fn critical_temperature() -> f64 {
    2.0 / (1.0 + 2.0_f64.sqrt()).ln()
}

/// β_c = ln(1 + √2) / 2 ≈ 0.4407
pub fn critical_beta() -> f64 {
    1.0 / critical_temperature()
}

/// Magnetization per site at T = 0 (all spins aligned)
pub fn magnetization_at_zero_temp() -> f64 {
    1.0
}

/// Energy per site at T = 0: four aligned neighbors, each bond shared, E = -2J
pub fn energy_per_site_at_zero_temp() -> f64 {
    -2.0
}

/// Whether `beta` lies on the ordered side of the transition for coupling J.
pub fn is_ordered_phase(beta: f64, coupling: f64) -> bool {
    beta * coupling > critical_beta()
}

/// β at which the measured `|m|` first rises through `threshold`, by linear
/// interpolation between the bracketing points. Points must be sorted by β.
pub fn estimate_crossing(points: &[PhasePoint], threshold: f64) -> Option<f64> {
    points
        .iter()
        .tuple_windows()
        .find(|(a, b)| a.magnetization < threshold && b.magnetization >= threshold)
        .map(|(a, b)| {
            let t = (threshold - a.magnetization) / (b.magnetization - a.magnetization);
            a.beta + t * (b.beta - a.beta)
        })
}
