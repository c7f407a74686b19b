//! Scripted container runtime for init scenarios.

use bollard::errors::Error as BollardError;
use bollard::models::{
    ContainerInspectResponse, ContainerState, ContainerStateStatusEnum,
    ContainerSummary as RawContainerSummary,
};
use mockall::mock;
use podinit::engine::{ContainerRuntime, InspectContainerFuture, ListContainersFuture, PingFuture};

use super::state::ScriptedContainer;

mock! {
    #[derive(Debug)]
    pub(crate) Runtime {}

    impl ContainerRuntime for Runtime {
        fn list_containers(&self) -> ListContainersFuture<'_>;
        fn inspect_container(&self, container: &str) -> InspectContainerFuture<'_>;
        fn ping(&self) -> PingFuture<'_>;
    }
}

fn status_for(state: &str) -> ContainerStateStatusEnum {
    match state {
        "created" => ContainerStateStatusEnum::CREATED,
        "exited" => ContainerStateStatusEnum::EXITED,
        "running" => ContainerStateStatusEnum::RUNNING,
        "paused" => ContainerStateStatusEnum::PAUSED,
        "restarting" => ContainerStateStatusEnum::RESTARTING,
        "removing" => ContainerStateStatusEnum::REMOVING,
        _ => ContainerStateStatusEnum::DEAD,
    }
}

fn broken_pipe() -> BollardError {
    BollardError::IOError {
        err: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection dropped"),
    }
}

/// Build a runtime that answers from the scripted containers.
///
/// Containers not in the script answer inspect with a `404`. Inspecting
/// `transport_break_at` fails without a response; `unreachable` makes
/// `ping` fail the same way.
pub(crate) fn scripted_runtime(
    containers: Vec<ScriptedContainer>,
    transport_break_at: Option<String>,
    unreachable: bool,
) -> MockRuntime {
    let mut mock = MockRuntime::new();

    mock.expect_ping().returning(move || {
        let answer = if unreachable { Err(broken_pipe()) } else { Ok(()) };
        Box::pin(async move { answer })
    });

    let listing: Vec<RawContainerSummary> = containers
        .iter()
        .map(|container| RawContainerSummary {
            id: Some(container.id.clone()),
            names: Some(vec![format!("/{}", container.id)]),
            created: Some(container.created),
            ..RawContainerSummary::default()
        })
        .collect();
    mock.expect_list_containers().returning(move || {
        let snapshot = listing.clone();
        Box::pin(async move { Ok(snapshot) })
    });

    mock.expect_inspect_container().returning(move |id: &str| {
        let answer = if transport_break_at.as_deref() == Some(id) {
            Err(broken_pipe())
        } else {
            containers
                .iter()
                .find(|container| container.id == id)
                .map(|container| ContainerInspectResponse {
                    id: Some(container.id.clone()),
                    state: Some(ContainerState {
                        status: Some(status_for(&container.state)),
                        ..ContainerState::default()
                    }),
                    ..ContainerInspectResponse::default()
                })
                .ok_or_else(|| BollardError::DockerResponseServerError {
                    status_code: 404,
                    message: format!("no such container: {id}"),
                })
        };
        Box::pin(async move { answer })
    });

    mock
}
