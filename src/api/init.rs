//! Container initialisation orchestration.
//!
//! Validates the selection, dispatches it to the bound engine, then hands
//! the reports to the aggregator and error reporter. Validation failures
//! return before the engine is contacted.

use std::io::Write;

use tracing::debug;

use crate::engine::{ContainerEngine, EngineContext};
use crate::error::Result as PodinitResult;
use crate::report::{ErrorReporter, aggregate};
use crate::selection::{Selection, SelectionOptions};

use super::CommandOutcome;

/// Parameters for initialising containers.
///
/// Groups the arguments required by [`init_containers`] into a single
/// struct to satisfy the "no more than four parameters" convention.
pub struct InitParams<'a> {
    /// The engine bound for this invocation.
    pub engine: &'a dyn ContainerEngine,
    /// Cancellation context for the engine call.
    pub context: &'a EngineContext,
    /// Tokio runtime handle for blocking execution.
    pub runtime_handle: &'a tokio::runtime::Handle,
    /// Container names or IDs given on the command line.
    pub ids: Vec<String>,
    /// Selection modifiers given on the command line.
    pub options: SelectionOptions,
}

/// Initialise the selected containers.
///
/// Writes one line per initialised container to `out` and one `Error:` line
/// per failed container to `err`.
///
/// # Errors
///
/// Returns `PodinitError` variants:
/// - `SelectionError` if the selection is contradictory or empty.
/// - `DispatchError` if the engine call fails as a whole.
/// - `Output` if writing to either sink fails.
pub fn init_containers<O: Write, E: Write>(
    params: InitParams<'_>,
    out: &mut O,
    err: &mut E,
) -> PodinitResult<CommandOutcome> {
    let InitParams {
        engine,
        context,
        runtime_handle,
        ids,
        options,
    } = params;

    let selection = Selection::from_args(ids, options)?;
    debug!(mode = %engine.mode(), ?selection, "dispatching init");

    let reports = runtime_handle.block_on(engine.container_init(
        context,
        selection.ids(),
        selection.options(),
    ))?;

    let result = aggregate(reports, out)?;
    Ok(ErrorReporter::report(&result.failures, err)?)
}
