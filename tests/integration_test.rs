//! End-to-end tests for the `ising` application
//!
//! These tests drive configuration loading, run resolution and the CSV
//! outputs the same way the binary does.

use std::path::PathBuf;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use clap::Parser;
    use ising_mc::app::{
        run_equilibration, run_phase_diagram, EquilibrationRun, IsingApplication, PhaseDiagramRun,
    };
    use ising_mc::config::{Args, Config, DEFAULT_BETA};
    use ising_mc::{IsingError, SitePolicy};
    use std::fs;

    /// Helper function to get the path to example files
    fn example_path(filename: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("example")
            .join(filename)
    }

    fn args_for(config_path: &str, extra: &[&str]) -> Args {
        let mut argv = vec!["ising", "--config-file", config_path];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_single_sweep_example() {
        let path = example_path("single_sweep.yaml");
        let config = Config::from_file(&path).unwrap();
        let args = args_for(path.to_str().unwrap(), &[]);

        let run = EquilibrationRun::configure(&args, &config).unwrap();
        assert_eq!(run.side, 5);
        assert_eq!(run.iterations, 25);
        assert_eq!(run.policy, SitePolicy::SweepWithoutReplacement);

        let outcome = run_equilibration(&run).unwrap();
        assert_eq!(outcome.trace.running_mean.len(), 26);

        // Uphill moves cost at least 4J here, so the energy can only fall
        let final_energy = outcome
            .lattice
            .energy_per_site(run.params.coupling, run.params.field);
        assert!(final_energy <= outcome.initial_energy + 1e-12);
    }

    #[test]
    fn test_equilibration_example_resolves() {
        let path = example_path("equilibration.yaml");
        let config = Config::from_file(&path).unwrap();
        let args = args_for(path.to_str().unwrap(), &[]);

        let eq = EquilibrationRun::configure(&args, &config).unwrap();
        assert_eq!(eq.side, 30);
        assert_eq!(eq.iterations, 1000 * 900);
        assert_eq!(eq.params.beta, 0.2);
        assert_eq!(eq.seed, Some(42));

        let phase = PhaseDiagramRun::configure(&args, &config).unwrap();
        assert_eq!(phase.betas.len(), 50);
        assert_eq!(phase.betas[0], 0.1);
        assert_eq!(phase.betas[49], 4.0);
        assert!(phase.sweep.parallel);
    }

    #[test]
    fn test_missing_beta_uses_default() {
        let config = Config::from_yaml("lattice:\n  size: 4\nequilibration: {}\n").unwrap();
        let run = EquilibrationRun::configure(&args_for("unused.yaml", &[]), &config).unwrap();
        assert_eq!(run.params.beta, DEFAULT_BETA);
        assert_eq!(run.iterations, 1000 * 16);
    }

    #[test]
    fn test_cli_overrides() {
        let path = example_path("equilibration.yaml");
        let config = Config::from_file(&path).unwrap();
        let args = args_for(
            path.to_str().unwrap(),
            &[
                "--seed",
                "9",
                "--beta",
                "0.7",
                "--iterations",
                "100",
                "--sequential",
            ],
        );

        let eq = EquilibrationRun::configure(&args, &config).unwrap();
        assert_eq!(eq.params.beta, 0.7);
        assert_eq!(eq.iterations, 100);
        assert_eq!(eq.seed, Some(9));

        let phase = PhaseDiagramRun::configure(&args, &config).unwrap();
        assert_eq!(phase.sweep.iterations, 100);
        assert_eq!(phase.sweep.seed, Some(9));
        assert!(!phase.sweep.parallel);
    }

    #[test]
    fn test_negative_counts_rejected() {
        let path = example_path("equilibration.yaml");
        let config = Config::from_file(&path).unwrap();
        let args = args_for(path.to_str().unwrap(), &["--iterations", "-5"]);

        let err = EquilibrationRun::configure(&args, &config).unwrap_err();
        assert_eq!(
            err.downcast_ref::<IsingError>(),
            Some(&IsingError::InvalidIterationCount(-5))
        );

        let bad_size = Config::from_yaml("lattice:\n  size: -2\nequilibration: {}\n").unwrap();
        let args = args_for("unused.yaml", &[]);
        let err = EquilibrationRun::configure(&args, &bad_size).unwrap_err();
        assert_eq!(
            err.downcast_ref::<IsingError>(),
            Some(&IsingError::InvalidSize(-2))
        );
        assert!(IsingApplication::new(args, bad_size).run().is_err());
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let config = Config::from_yaml(
            "lattice:\n  size: 8\nseed: 5\nequilibration:\n  iterations: 2000\n  beta: 0.5\n",
        )
        .unwrap();
        let args = args_for("unused.yaml", &[]);
        let run = EquilibrationRun::configure(&args, &config).unwrap();

        let first = run_equilibration(&run).unwrap();
        let second = run_equilibration(&run).unwrap();
        assert_eq!(first.trace.running_mean, second.trace.running_mean);
        assert_eq!(first.lattice, second.lattice);
    }

    #[test]
    fn test_phase_diagram_parallel_matches_sequential() {
        let config = Config::from_yaml(
            "lattice:\n  size: 6\nseed: 11\nphase_diagram:\n  points: 6\n  iterations: 3000\n",
        )
        .unwrap();

        let parallel = PhaseDiagramRun::configure(&args_for("unused.yaml", &[]), &config).unwrap();
        let sequential =
            PhaseDiagramRun::configure(&args_for("unused.yaml", &["--sequential"]), &config)
                .unwrap();

        let (a, _) = run_phase_diagram(&parallel).unwrap();
        let (b, _) = run_phase_diagram(&sequential).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|p| (0.0..=1.0).contains(&p.magnetization)));
    }

    #[test]
    fn test_application_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let trace = dir.path().join("trace.csv");
        let phase = dir.path().join("phase.csv");
        let config_path = dir.path().join("config.yaml");

        let yaml = format!(
            "lattice:\n  size: 6\nseed: 3\n\
             equilibration:\n  iterations: 500\n\
             phase_diagram:\n  points: 4\n  iterations: 300\n\
             output:\n  trace_csv: '{}'\n  phase_csv: '{}'\n",
            trace.display(),
            phase.display()
        );
        fs::write(&config_path, yaml).unwrap();

        let config = Config::from_file(&config_path).unwrap();
        let args = args_for(config_path.to_str().unwrap(), &[]);
        IsingApplication::new(args, config).run().unwrap();

        let trace_text = fs::read_to_string(&trace).unwrap();
        let lines: Vec<&str> = trace_text.lines().collect();
        assert_eq!(lines[0], "iteration,magnetization");
        assert_eq!(lines.len(), 1 + 501);
        assert!(lines[501].starts_with("500,"));

        let phase_text = fs::read_to_string(&phase).unwrap();
        let lines: Vec<&str> = phase_text.lines().collect();
        assert_eq!(lines[0], "beta,magnetization");
        assert_eq!(lines.len(), 1 + 4);
        assert!(lines[4].starts_with("4.0000000000,"));
    }
}
