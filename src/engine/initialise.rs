//! Per-container initialisation policy.
//!
//! Podman's libpod API has a dedicated init endpoint, but the Docker-compatible
//! API that bollard speaks does not. On that API a container's runtime
//! configuration and mounts are prepared at creation, so initialising a target
//! here means inspecting it and confirming it is in a state where that
//! preparation holds: `created` (never started) or `exited` (stopped, prepared
//! again on the next start). Repeating the request for such a container
//! succeeds.

use bollard::errors::Error as BollardError;
use tracing::debug;

use super::connection::{EngineFailure, classify_engine_error};
use super::runtime::{ContainerRuntime, summarise};
use crate::error::ContainerError;
use crate::selection::ContainerSummary;

/// Container states in which initialisation succeeds.
const INITIALISABLE_STATES: &[&str] = &["created", "exited"];

/// Initialise a single container.
///
/// # Errors
///
/// Returns `EngineFailure::Target` when the engine rejects the container or
/// reports a state that cannot be initialised, and `EngineFailure::Transport`
/// when the request did not complete.
pub(crate) async fn initialise_container<R>(
    runtime: &R,
    container: &str,
) -> Result<(), EngineFailure>
where
    R: ContainerRuntime + ?Sized,
{
    let inspect = runtime
        .inspect_container(container)
        .await
        .map_err(|error| classify_engine_error(&error, container))?;

    let state = inspect
        .state
        .and_then(|state| state.status)
        .map(|status| status.to_string())
        .filter(|status| !status.is_empty())
        .unwrap_or_else(|| String::from("unknown"));

    if INITIALISABLE_STATES.contains(&state.as_str()) {
        debug!(container, %state, "container initialised");
        return Ok(());
    }

    Err(EngineFailure::Target(ContainerError::InvalidState {
        container: container.to_owned(),
        state,
    }))
}

/// Take a snapshot of the containers the runtime knows.
///
/// # Errors
///
/// Returns the raw `Bollard` error so each backend can apply its own
/// transport policy.
pub(crate) async fn snapshot<R>(runtime: &R) -> Result<Vec<ContainerSummary>, BollardError>
where
    R: ContainerRuntime + ?Sized,
{
    let raw = runtime.list_containers().await?;
    Ok(raw.into_iter().filter_map(summarise).collect())
}
