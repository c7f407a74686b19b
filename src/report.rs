//! Result aggregation and error reporting.
//!
//! Reports are consumed in the order the engine returned them. Successful
//! identifiers are written as they are met, so output already produced is
//! never lost to a later failure. Failures are collected and turned into the
//! command's final outcome once the batch has been seen.

use std::io::Write;

use tracing::info;

use crate::api::CommandOutcome;
use crate::engine::Report;
use crate::error::ContainerError;

/// Combined result of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Identifiers of initialised containers, in report order.
    pub succeeded: Vec<String>,
    /// Per-target failures, in report order.
    pub failures: Vec<ContainerError>,
}

impl Aggregate {
    /// Fold reports without writing anything.
    #[must_use]
    pub fn from_reports(reports: &[Report]) -> Self {
        let mut aggregate = Self::default();
        for report in reports {
            aggregate.push(report.clone());
        }
        aggregate
    }

    fn push(&mut self, report: Report) {
        match report.into_parts() {
            (id, Ok(())) => self.succeeded.push(id),
            (_, Err(error)) => self.failures.push(error),
        }
    }

    /// Number of reports folded in.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }

    /// Return whether no reports were folded in.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fold reports, writing each successful identifier to `out` on its own line.
///
/// # Errors
///
/// Returns any error raised while writing to `out`.
pub fn aggregate<W: Write>(reports: Vec<Report>, out: &mut W) -> std::io::Result<Aggregate> {
    let mut result = Aggregate::default();
    for report in reports {
        if report.is_success() {
            writeln!(out, "{}", report.id())?;
        }
        result.push(report);
    }
    out.flush()?;
    if result.is_empty() {
        info!("no containers selected");
    } else {
        info!(
            total = result.len(),
            succeeded = result.succeeded.len(),
            failed = result.failures.len(),
            "init batch finished"
        );
    }
    Ok(result)
}

/// Turns collected failures into the command outcome.
pub struct ErrorReporter;

impl ErrorReporter {
    /// Write one `Error:` line per failure to `err` and pick the outcome.
    ///
    /// An empty batch with no failures is a success.
    ///
    /// # Errors
    ///
    /// Returns any error raised while writing to `err`.
    pub fn report<W: Write>(
        failures: &[ContainerError],
        err: &mut W,
    ) -> std::io::Result<CommandOutcome> {
        for failure in failures {
            writeln!(err, "Error: {failure}")?;
        }
        err.flush()?;
        if failures.is_empty() {
            Ok(CommandOutcome::Success)
        } else {
            Ok(CommandOutcome::Failed {
                failures: failures.len(),
            })
        }
    }
}
