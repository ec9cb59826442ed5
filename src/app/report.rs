use crate::app::runner::{EquilibrationOutcome, EquilibrationRun};
use crate::ising::analysis::{critical_beta, is_ordered_phase};
use crate::ising::{estimate_crossing, PhasePoint};
use itertools::{Itertools, MinMaxResult};
use std::time::Duration;
use tracing::info;

/// Lattices up to this side are printed after equilibration
const MAX_PRINTED_SIDE: usize = 12;

pub fn report_equilibration(run: &EquilibrationRun, outcome: &EquilibrationOutcome) {
    let trace = &outcome.trace;
    let params = &run.params;

    info!("\nEquilibration finished in {:.3} s", trace.elapsed.as_secs_f64());
    info!("  Steps:                {}", trace.iterations());
    info!("  Acceptance rate:      {:.4}", trace.acceptance_rate());
    info!("  <|m|>:                {:.6}", trace.final_mean());
    info!(
        "  Final |m|:            {:.6}",
        outcome.lattice.magnetization()
    );
    info!(
        "  Energy per site:      {:.6} -> {:.6}",
        outcome.initial_energy,
        outcome
            .lattice
            .energy_per_site(params.coupling, params.field)
    );

    if let MinMaxResult::MinMax(lo, hi) = trace.running_mean.iter().copied().minmax() {
        info!("  Running mean range:   [{:.6}, {:.6}]", lo, hi);
    }

    if run.side <= MAX_PRINTED_SIDE {
        info!("\nFinal configuration:\n{}", outcome.lattice);
    }
}

pub fn report_phase_diagram(points: &[PhasePoint], coupling: f64, elapsed: Duration) {
    info!(
        "\nPhase diagram finished in {:.3} s ({} points)",
        elapsed.as_secs_f64(),
        points.len()
    );
    info!("  Onsager beta_c = {:.6} (J = 1)", critical_beta());

    info!("\n      beta      <|m|>  phase");
    for point in points {
        info!(
            "  {:>8.4}  {:>9.6}  {}",
            point.beta,
            point.magnetization,
            if is_ordered_phase(point.beta, coupling) {
                "ordered"
            } else {
                "disordered"
            }
        );
    }

    let sorted = points
        .iter()
        .copied()
        .sorted_by(|a, b| a.beta.total_cmp(&b.beta))
        .collect_vec();
    match estimate_crossing(&sorted, 0.5) {
        Some(beta) => info!("\n  <|m|> crosses 0.5 near beta = {:.4}", beta),
        None => info!("\n  <|m|> does not cross 0.5 on this grid"),
    }
}
