//! Engine backend that forwards requests to a remote container service.
//!
//! A remote call is bounded by a timeout and by the caller's context. Any
//! transport failure ends the whole call: the caller gets a single
//! `DispatchError` and no partial reports. Failures the service reports
//! about an individual container stay in that container's report.

use std::time::Duration;

use tracing::{debug, warn};

use super::connection::{EngineFailure, is_transport_error};
use super::initialise::{initialise_container, snapshot};
use super::runtime::ContainerRuntime;
use super::{
    ContainerEngine, ContainerInitFuture, EngineContext, InitOptions, Report, validate_request,
};
use crate::error::DispatchError;
use crate::registry::EngineMode;

/// Engine backend bound to a remote container service.
#[derive(Debug)]
pub struct RemoteEngine<R> {
    runtime: R,
    timeout: Duration,
}

impl<R> RemoteEngine<R>
where
    R: ContainerRuntime + Send + Sync,
{
    /// Bind the engine to a runtime with a per-call timeout.
    #[must_use]
    pub const fn new(runtime: R, timeout: Duration) -> Self {
        Self { runtime, timeout }
    }

    #[expect(
        clippy::integer_division_remainder_used,
        reason = "false positive triggered inside tokio::select! expansion"
    )]
    async fn run(
        &self,
        context: EngineContext,
        ids: Vec<String>,
        options: InitOptions,
    ) -> Result<Vec<Report>, DispatchError> {
        let selection = validate_request(ids, options)?;
        if context.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        let bounded = tokio::time::timeout(self.timeout, async {
            self.runtime.ping().await.map_err(|error| transport(&error))?;

            let targets = if selection.needs_snapshot() {
                let containers = snapshot(&self.runtime).await.map_err(|error| {
                    if is_transport_error(&error) {
                        transport(&error)
                    } else {
                        DispatchError::Engine {
                            message: error.to_string(),
                        }
                    }
                })?;
                selection.resolve(&containers)?
            } else {
                selection.resolve(&[])?
            };
            debug!(targets = targets.len(), "resolved remote selection");

            let mut reports = Vec::with_capacity(targets.len());
            for target in targets {
                match initialise_container(&self.runtime, &target).await {
                    Ok(()) => reports.push(Report::succeeded(target)),
                    Err(EngineFailure::Target(error)) => {
                        warn!(container = %target, %error, "container failed to initialise");
                        reports.push(Report::failed(target, error));
                    }
                    Err(EngineFailure::Transport(message)) => {
                        return Err(DispatchError::Transport { message });
                    }
                }
            }
            Ok::<_, DispatchError>(reports)
        });

        let outcome = tokio::select! {
            biased;
            () = context.cancelled() => Err(DispatchError::Cancelled),
            result = bounded => result.unwrap_or(Err(DispatchError::Timeout {
                seconds: self.timeout.as_secs(),
            })),
        };

        if let Err(ref error) = outcome {
            warn!(%error, "remote init call failed");
        }
        outcome
    }
}

fn transport(error: &bollard::errors::Error) -> DispatchError {
    DispatchError::Transport {
        message: error.to_string(),
    }
}

impl<R> ContainerEngine for RemoteEngine<R>
where
    R: ContainerRuntime + Send + Sync,
{
    fn mode(&self) -> EngineMode {
        EngineMode::Remote
    }

    fn container_init(
        &self,
        context: &EngineContext,
        ids: &[String],
        options: InitOptions,
    ) -> ContainerInitFuture<'_> {
        let context_owned = context.clone();
        let ids_owned = ids.to_vec();
        Box::pin(async move { self.run(context_owned, ids_owned, options).await })
    }
}
