//! Output formatting and logging utilities

use crate::ising::PhasePoint;
use color_eyre::eyre::Result;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, fmt::format::Writer, fmt::layer, fmt::time::FormatTime,
    layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let duration = StdSystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();

        let total_seconds = duration.as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Setup logging to file or stdout. `verbose` lowers the level to DEBUG.
///
/// A second call is a no-op: the first subscriber stays installed.
pub fn setup_output(output_path: Option<&String>, verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    match output_path {
        Some(path) => {
            if let Ok(log) = File::create(path) {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false)
                    .with_filter(level);
                if Registry::default().with(file_layer).try_init().is_ok() {
                    info!("Output will be written to: {}", path);
                }
            } else {
                eprintln!("Could not create output file: {}", path);
            }
        }
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true)
                .with_filter(level);
            if Registry::default().with(stdout_layer).try_init().is_ok() {
                info!("Output will be printed to stdout");
            }
        }
    }
}

/// Running mean of `|m|`, one row per sample; row 0 is the initial lattice.
pub fn write_trace_csv<W: Write>(writer: &mut W, running_mean: &[f64]) -> Result<()> {
    writeln!(writer, "iteration,magnetization")?;
    for (iteration, m) in running_mean.iter().enumerate() {
        writeln!(writer, "{},{:.10}", iteration, m)?;
    }
    Ok(())
}

pub fn write_phase_csv<W: Write>(writer: &mut W, points: &[PhasePoint]) -> Result<()> {
    writeln!(writer, "beta,magnetization")?;
    for point in points {
        writeln!(writer, "{:.10},{:.10}", point.beta, point.magnetization)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_csv() {
        let mut buffer = Vec::new();
        write_trace_csv(&mut buffer, &[1.0, 0.5]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "iteration,magnetization\n0,1.0000000000\n1,0.5000000000\n"
        );
    }

    #[test]
    fn test_phase_csv() {
        let points = [
            PhasePoint {
                beta: 0.1,
                magnetization: 0.02,
            },
            PhasePoint {
                beta: 4.0,
                magnetization: 1.0,
            },
        ];
        let mut buffer = Vec::new();
        write_phase_csv(&mut buffer, &points).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "beta,magnetization");
        assert_eq!(lines[2], "4.0000000000,1.0000000000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_trace() {
        let mut buffer = Vec::new();
        write_trace_csv(&mut buffer, &[]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "iteration,magnetization\n");
    }
}
