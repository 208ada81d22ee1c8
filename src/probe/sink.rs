//! Destinations for human-readable probe outcomes.

use crate::probe::ProbeReport;
use std::io::Write;
use tracing::{error, info, warn};
use yansi::{Condition, Paint};

/// Receives the single report produced by a probe run.
pub trait ReportSink {
    fn emit(&mut self, report: &ProbeReport);
}

/// Emits the report as a structured tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&mut self, report: &ProbeReport) {
        match report {
            ProbeReport::Found { column, value } => {
                info!(column = %column, value = %value, "{report}");
            }
            ProbeReport::Empty { table } => {
                warn!(table = %table, "{report}");
            }
            ProbeReport::Failed(e) => {
                error!(kind = e.kind(), error = %e.chain(), "probe failed");
            }
        }
    }
}

/// Writes the report line to stdout, failures to stderr.
///
/// Each stream is colored only when its own condition holds, so a piped
/// stdout stays plain while an interactive stderr keeps its color.
pub struct StdoutSink<O: Write = std::io::Stdout, E: Write = std::io::Stderr> {
    out: O,
    err: E,
    out_color: Condition,
    err_color: Condition,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
            err: std::io::stderr(),
            out_color: Condition::STDOUT_IS_TTY,
            err_color: Condition::STDERR_IS_TTY,
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Write, E: Write> StdoutSink<O, E> {
    /// Plain output into arbitrary writers.
    pub fn with_writers(out: O, err: E) -> Self {
        Self {
            out,
            err,
            out_color: Condition::NEVER,
            err_color: Condition::NEVER,
        }
    }

    #[cfg(test)]
    fn with_color(mut self, out_color: Condition, err_color: Condition) -> Self {
        self.out_color = out_color;
        self.err_color = err_color;
        self
    }

    #[cfg(test)]
    fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> ReportSink for StdoutSink<O, E> {
    fn emit(&mut self, report: &ProbeReport) {
        let line = report.to_string();
        // A closed pipe on stdout/stderr is not worth aborting over
        let _ = match report {
            ProbeReport::Found { .. } => {
                writeln!(self.out, "{}", line.green().whenever(self.out_color))
            }
            ProbeReport::Empty { .. } => {
                writeln!(self.out, "{}", line.yellow().whenever(self.out_color))
            }
            ProbeReport::Failed(_) => {
                writeln!(self.err, "{}", line.red().whenever(self.err_color))
            }
        };
    }
}

/// Collects rendered report lines in memory.
impl ReportSink for Vec<String> {
    fn emit(&mut self, report: &ProbeReport) {
        self.push(report.to_string());
    }
}

/// Fans a report out to two sinks.
impl<A: ReportSink, B: ReportSink> ReportSink for (A, B) {
    fn emit(&mut self, report: &ProbeReport) {
        self.0.emit(report);
        self.1.emit(report);
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn emit(&mut self, report: &ProbeReport) {
        (**self).emit(report);
    }
}
