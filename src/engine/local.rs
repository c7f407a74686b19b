//! In-process engine backend.
//!
//! The local engine talks to the container runtime on this host. The batch
//! as a whole fails only when the request itself is malformed or the
//! container snapshot cannot be taken; every other failure is recorded in
//! the affected target's report and processing moves on.

use tracing::{debug, warn};

use super::connection::EngineFailure;
use super::initialise::{initialise_container, snapshot};
use super::runtime::ContainerRuntime;
use super::{
    ContainerEngine, ContainerInitFuture, EngineContext, InitOptions, Report, validate_request,
};
use crate::error::DispatchError;
use crate::registry::EngineMode;

/// Engine backend bound to the local container runtime.
#[derive(Debug)]
pub struct LocalEngine<R> {
    runtime: R,
}

impl<R> LocalEngine<R>
where
    R: ContainerRuntime + Send + Sync,
{
    /// Bind the engine to a runtime.
    #[must_use]
    pub const fn new(runtime: R) -> Self {
        Self { runtime }
    }

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

        let targets = if selection.needs_snapshot() {
            let containers = snapshot(&self.runtime)
                .await
                .map_err(|error| DispatchError::Engine {
                    message: error.to_string(),
                })?;
            selection.resolve(&containers)?
        } else {
            selection.resolve(&[])?
        };
        debug!(targets = targets.len(), "resolved local selection");

        let mut reports = Vec::with_capacity(targets.len());
        for target in targets {
            if context.is_cancelled() {
                return Err(DispatchError::Cancelled);
            }
            let outcome = initialise_container(&self.runtime, &target)
                .await
                .map_err(EngineFailure::into_container_error);
            if let Err(ref error) = outcome {
                warn!(container = %target, %error, "container failed to initialise");
            }
            reports.push(Report::new(target, outcome));
        }
        Ok(reports)
    }
}

impl<R> ContainerEngine for LocalEngine<R>
where
    R: ContainerRuntime + Send + Sync,
{
    fn mode(&self) -> EngineMode {
        EngineMode::Local
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
