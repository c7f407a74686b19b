//! Container runtime capability consumed by both engine backends.
//!
//! The runtime is the opaque collaborator that owns container state. It is
//! expressed as a small trait over the `Bollard` calls the engines need so
//! that local and remote behaviour can be unit-tested without a daemon.

use std::future::Future;
use std::pin::Pin;

use bollard::Docker;
use bollard::errors::Error as BollardError;
use bollard::models::{ContainerInspectResponse, ContainerSummary as RawContainerSummary};
use bollard::query_parameters::{InspectContainerOptions, ListContainersOptionsBuilder};

use crate::selection::ContainerSummary;

/// Boxed future type returned by [`ContainerRuntime::list_containers`].
pub type ListContainersFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<RawContainerSummary>, BollardError>> + Send + 'a>>;

/// Boxed future type returned by [`ContainerRuntime::inspect_container`].
pub type InspectContainerFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ContainerInspectResponse, BollardError>> + Send + 'a>>;

/// Boxed future type returned by [`ContainerRuntime::ping`].
pub type PingFuture<'a> = Pin<Box<dyn Future<Output = Result<(), BollardError>> + Send + 'a>>;

/// Behaviour required from the container runtime.
pub trait ContainerRuntime {
    /// List every container the runtime knows, running or not.
    fn list_containers(&self) -> ListContainersFuture<'_>;

    /// Inspect a container by name or ID.
    fn inspect_container(&self, container: &str) -> InspectContainerFuture<'_>;

    /// Check that the runtime service answers requests.
    fn ping(&self) -> PingFuture<'_>;
}

impl ContainerRuntime for Docker {
    fn list_containers(&self) -> ListContainersFuture<'_> {
        let options = ListContainersOptionsBuilder::new().all(true).build();
        Box::pin(async move { Self::list_containers(self, Some(options)).await })
    }

    fn inspect_container(&self, container: &str) -> InspectContainerFuture<'_> {
        let container_owned = String::from(container);
        Box::pin(async move {
            Self::inspect_container(self, &container_owned, None::<InspectContainerOptions>).await
        })
    }

    fn ping(&self) -> PingFuture<'_> {
        Box::pin(async move { Self::ping(self).await.map(|_| ()) })
    }
}

/// Convert a raw engine listing entry into a [`ContainerSummary`].
///
/// Entries without an ID cannot be targeted and are dropped.
pub(crate) fn summarise(raw: RawContainerSummary) -> Option<ContainerSummary> {
    let id = raw.id.filter(|id| !id.is_empty())?;
    Some(ContainerSummary::new(id, raw.created.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn summarise_keeps_id_and_creation_time() {
        let raw = RawContainerSummary {
            id: Some(String::from("abc123")),
            names: Some(vec![String::from("/web")]),
            created: Some(1_700_000_000),
            ..RawContainerSummary::default()
        };

        let summary = summarise(raw).expect("summary should exist");

        assert_eq!(summary.id, "abc123");
        assert_eq!(summary.created, 1_700_000_000);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    fn summarise_drops_entries_without_id(#[case] id: Option<String>) {
        let raw = RawContainerSummary {
            id,
            ..RawContainerSummary::default()
        };

        assert!(summarise(raw).is_none());
    }
}
