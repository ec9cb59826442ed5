pub mod analysis;
pub mod error;
pub mod lattice;
pub mod metropolis;
pub mod observables;
pub mod phase;
pub mod sampler;

pub use analysis::{critical_beta, estimate_crossing};
pub use error::IsingError;
pub use lattice::{site_count, Lattice, Site, Spin};
pub use metropolis::{accepts, acceptance_probability, flip_energy_change, try_flip, IsingParams};
pub use observables::{equilibrate, time_averaged_magnetization, EquilibrationTrace, RunningMean};
pub use phase::{linspace, PhasePoint, PhaseSweep};
pub use sampler::{
    run, seeded_rng, Chain, IsingRng, Sample, SitePolicy, SiteSelection, SiteSelector,
    SweepSites, UniformSites,
};
