mod report;
mod runner;

pub use runner::{
    run_equilibration, run_phase_diagram, EquilibrationOutcome, EquilibrationRun,
    PhaseDiagramRun,
};

use self::report::{report_equilibration, report_phase_diagram};
use crate::config::{Args, Config};
use crate::io::{setup_output, write_phase_csv, write_trace_csv};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{info, warn};

pub struct IsingApplication {
    args: Args,
    config: Config,
}

impl IsingApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = Config::from_file(&args.config_file)?;
        Ok(Self { args, config })
    }

    pub fn new(args: Args, config: Config) -> Self {
        Self { args, config }
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref(), self.args.verbose);

        info!("Reading configuration from: {}", self.args.config_file);
        info!("Configuration loaded:\n{:?}", self.config);
        self.config.lattice_side()?;

        let equilibration = self.config.is_equilibration_enabled();
        let phase_diagram = self.config.is_phase_diagram_enabled();
        if !equilibration && !phase_diagram {
            warn!("Neither equilibration nor phase_diagram is enabled, nothing to do");
            return Ok(());
        }

        if equilibration {
            let run = EquilibrationRun::configure(&self.args, &self.config)?;
            let outcome = run_equilibration(&run)?;
            report_equilibration(&run, &outcome);

            if let Some(path) = self.config.trace_csv() {
                write_csv(path, |w| write_trace_csv(w, &outcome.trace.running_mean))?;
            }
        }

        if phase_diagram {
            let run = PhaseDiagramRun::configure(&self.args, &self.config)?;
            let (points, elapsed) = run_phase_diagram(&run)?;
            report_phase_diagram(&points, run.sweep.coupling, elapsed);

            if let Some(path) = self.config.phase_csv() {
                write_csv(path, |w| write_phase_csv(w, &points))?;
            }
        }

        Ok(())
    }
}

fn write_csv<F>(path: &str, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path).wrap_err_with(|| format!("Unable to create {}", path))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()?;
    info!("Wrote {}", path);
    Ok(())
}
