//! Engine facade for container initialisation.
//!
//! A single [`ContainerEngine`] operation, `container_init`, is implemented by
//! two backends. [`LocalEngine`] drives the container runtime on this host;
//! [`RemoteEngine`] forwards to a remote service and treats the network as
//! fallible. Callers bind one backend per invocation with [`bind_engine`] and
//! never branch on the mode afterwards.
//!
//! The local endpoint is resolved through a priority-based fallback chain:
//!
//! 1. CLI argument (`--engine-socket`)
//! 2. Config file (`engine_socket` in TOML)
//! 3. `PODINIT_ENGINE_SOCKET` environment variable
//! 4. `DOCKER_HOST` environment variable
//! 5. `CONTAINER_HOST` environment variable
//! 6. `PODMAN_HOST` environment variable
//! 7. Platform default (`/var/run/docker.sock` on Unix)
//!
//! The remote endpoint comes from `engine.remote_url` (or
//! `PODINIT_ENGINE_REMOTE_URL`), falling back to `CONTAINER_HOST`.

mod connection;
mod context;
mod initialise;
mod local;
mod remote;
mod runtime;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

pub use connection::{EngineConnector, SocketResolver};
pub use context::EngineContext;
pub use local::LocalEngine;
pub use remote::RemoteEngine;
pub use runtime::{ContainerRuntime, InspectContainerFuture, ListContainersFuture, PingFuture};

use crate::config::AppConfig;
use crate::error::{ContainerError, DispatchError, PodinitError};
use crate::registry::EngineMode;
use crate::selection::{Selection, SelectionOptions};

/// Selection modifiers accepted by [`ContainerEngine::container_init`].
pub type InitOptions = SelectionOptions;

/// Outcome for one resolved target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    id: String,
    outcome: Result<(), ContainerError>,
}

impl Report {
    /// Create a report from an outcome.
    #[must_use]
    pub fn new(id: impl Into<String>, outcome: Result<(), ContainerError>) -> Self {
        Self {
            id: id.into(),
            outcome,
        }
    }

    /// Create a successful report.
    #[must_use]
    pub fn succeeded(id: impl Into<String>) -> Self {
        Self::new(id, Ok(()))
    }

    /// Create a failed report.
    #[must_use]
    pub fn failed(id: impl Into<String>, error: ContainerError) -> Self {
        Self::new(id, Err(error))
    }

    /// The identifier the target was requested or resolved by.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The failure for this target, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ContainerError> {
        self.outcome.as_ref().err()
    }

    /// Return whether the target was initialised.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Split the report into its identifier and outcome.
    pub fn into_parts(self) -> (String, Result<(), ContainerError>) {
        (self.id, self.outcome)
    }
}

/// Boxed future type returned by [`ContainerEngine::container_init`].
pub type ContainerInitFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Report>, DispatchError>> + Send + 'a>>;

/// The mode-independent engine operation.
///
/// Both backends accept the same inputs and produce the same report shape.
/// The returned reports hold exactly one entry per resolved target, in
/// resolution order. An `Err` means the call failed as a whole and no target
/// may be assumed processed.
pub trait ContainerEngine: Send + Sync {
    /// The mode this backend serves.
    fn mode(&self) -> EngineMode;

    /// Initialise the containers selected by `ids` and `options`.
    fn container_init(
        &self,
        context: &EngineContext,
        ids: &[String],
        options: InitOptions,
    ) -> ContainerInitFuture<'_>;
}

/// A backend bound for the lifetime of one invocation.
pub type BoundEngine = Box<dyn ContainerEngine>;

/// Validate a raw request as a backend receives it.
///
/// # Errors
///
/// Returns `DispatchError::InvalidRequest` for conflicting or empty
/// selections and for blank identifiers.
pub(crate) fn validate_request(
    ids: Vec<String>,
    options: InitOptions,
) -> Result<Selection, DispatchError> {
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(DispatchError::InvalidRequest {
            reason: String::from("container names or IDs must not be blank"),
        });
    }
    Selection::from_args(ids, options).map_err(|error| DispatchError::InvalidRequest {
        reason: error.to_string(),
    })
}

/// Bind the backend for `mode`.
///
/// Building the client does not contact the engine.
///
/// # Errors
///
/// Returns `ConfigError::MissingRequired` when remote mode has no endpoint,
/// or a `ContainerError` when the client cannot be built.
pub fn bind_engine<E: mockable::Env>(
    mode: EngineMode,
    config: &AppConfig,
    env: &E,
) -> Result<BoundEngine, PodinitError> {
    let resolver = SocketResolver::new(env);
    match mode {
        EngineMode::Local => {
            let socket =
                EngineConnector::resolve_socket(config.engine_socket.as_deref(), &resolver);
            debug!(%socket, "binding local engine");
            let docker = EngineConnector::connect(&socket)?;
            Ok(Box::new(LocalEngine::new(docker)))
        }
        EngineMode::Remote => {
            let url = EngineConnector::resolve_remote_url(
                config.engine.remote_url.as_deref(),
                &resolver,
            )?;
            let timeout = Duration::from_secs(config.engine.timeout_secs);
            debug!(%url, timeout_secs = config.engine.timeout_secs, "binding remote engine");
            let docker = EngineConnector::connect(&url)?;
            Ok(Box::new(RemoteEngine::new(docker, timeout)))
        }
    }
}
