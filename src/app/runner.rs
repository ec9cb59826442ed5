use crate::config::{resolve_iterations, Args, Config, DEFAULT_BETA};
use crate::ising::{
    equilibrate, seeded_rng, EquilibrationTrace, IsingParams, Lattice, PhasePoint, PhaseSweep,
    SitePolicy,
};
use color_eyre::eyre::Result;
use std::time::{Duration, Instant};
use tracing::info;

/// Resolved single-temperature run
#[derive(Debug, Clone)]
pub struct EquilibrationRun {
    pub side: usize,
    pub params: IsingParams,
    pub iterations: usize,
    pub policy: SitePolicy,
    pub seed: Option<u64>,
}

impl EquilibrationRun {
    /// Command-line overrides win over the configuration file.
    pub fn configure(args: &Args, config: &Config) -> Result<Self> {
        let side = config.lattice_side()?;
        let eq = config
            .equilibration
            .clone()
            .unwrap_or_default()
            .with_defaults();

        let beta = args.beta.or(eq.beta).unwrap_or(DEFAULT_BETA);
        let params = config.params(beta);
        params.validate()?;

        let iterations = resolve_iterations(args.iterations.or(eq.iterations), eq.sweeps, side)?;

        Ok(Self {
            side,
            params,
            iterations,
            policy: eq.site_policy.unwrap_or_default(),
            seed: args.seed.or(config.seed),
        })
    }
}

pub struct EquilibrationOutcome {
    pub trace: EquilibrationTrace,
    pub initial_energy: f64,
    pub lattice: Lattice,
}

pub fn run_equilibration(run: &EquilibrationRun) -> Result<EquilibrationOutcome> {
    info!(
        "\nEquilibrating {}x{} lattice at beta = {} ({} iterations, {})",
        run.side, run.side, run.params.beta, run.iterations, run.policy
    );

    let mut rng = seeded_rng(run.seed);
    let mut lattice = Lattice::random(run.side, &mut rng)?;
    let initial_energy = lattice.energy_per_site(run.params.coupling, run.params.field);

    let trace = equilibrate(&mut lattice, run.params, run.iterations, run.policy, &mut rng)?;

    Ok(EquilibrationOutcome {
        trace,
        initial_energy,
        lattice,
    })
}

/// Resolved phase-diagram sweep and its β grid
#[derive(Debug, Clone)]
pub struct PhaseDiagramRun {
    pub sweep: PhaseSweep,
    pub betas: Vec<f64>,
}

impl PhaseDiagramRun {
    pub fn configure(args: &Args, config: &Config) -> Result<Self> {
        let side = config.lattice_side()?;
        let phase = config
            .phase_diagram
            .clone()
            .unwrap_or_default()
            .with_defaults();

        let iterations =
            resolve_iterations(args.iterations.or(phase.iterations), phase.sweeps, side)?;
        let betas = phase.betas()?;

        let mut sweep = PhaseSweep::new(side, config.coupling(), config.field(), iterations);
        sweep.policy = phase.site_policy.unwrap_or_default();
        sweep.seed = args.seed.or(config.seed);
        sweep.parallel = !args.sequential && phase.parallel.unwrap_or(true);

        Ok(Self { sweep, betas })
    }
}

pub fn run_phase_diagram(run: &PhaseDiagramRun) -> Result<(Vec<PhasePoint>, Duration)> {
    info!(
        "\nPhase diagram: {} beta values in [{}, {}], {} iterations each, {}",
        run.betas.len(),
        run.betas.first().copied().unwrap_or_default(),
        run.betas.last().copied().unwrap_or_default(),
        run.sweep.iterations,
        if run.sweep.parallel {
            "parallel"
        } else {
            "sequential"
        }
    );

    let start = Instant::now();
    let points = run.sweep.run(&run.betas)?;
    Ok((points, start.elapsed()))
}
