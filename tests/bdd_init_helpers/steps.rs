//! Given/when steps for init scenarios.

use std::time::Duration;

use podinit::api::{InitParams, init_containers};
use podinit::engine::{BoundEngine, EngineContext, LocalEngine, RemoteEngine};
use podinit::error::{DispatchError, PodinitError, SelectionError};
use podinit::registry::EngineMode;
use podinit::selection::SelectionOptions;
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::runtime::scripted_runtime;
use super::state::{InitResult, InitState, ScriptedContainer};

/// Upper bound for scripted remote calls.
const REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

fn error_kind(error: &PodinitError) -> &'static str {
    match error {
        PodinitError::Selection(SelectionError::Conflict { .. }) => "conflict",
        PodinitError::Selection(SelectionError::Empty) => "empty-selection",
        PodinitError::Dispatch(DispatchError::Selection(SelectionError::NoContainers)) => {
            "no-containers"
        }
        PodinitError::Dispatch(DispatchError::Transport { .. }) => "transport",
        PodinitError::Dispatch(DispatchError::Timeout { .. }) => "timeout",
        PodinitError::Dispatch(DispatchError::Cancelled) => "cancelled",
        _ => "other",
    }
}

fn split_ids(ids: &str) -> Vec<String> {
    ids.split(',')
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

fn bind(init_state: &InitState) -> BoundEngine {
    let runtime = scripted_runtime(
        init_state.containers.get().unwrap_or_default(),
        init_state.transport_break_at.get(),
        init_state.unreachable.get().unwrap_or(false),
    );
    match init_state.mode.get().unwrap_or_default() {
        EngineMode::Local => Box::new(LocalEngine::new(runtime)),
        EngineMode::Remote => Box::new(RemoteEngine::new(runtime, REMOTE_TIMEOUT)),
    }
}

fn run_init(
    init_state: &InitState,
    ids: Vec<String>,
    options: SelectionOptions,
) -> StepResult<()> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    let engine = bind(init_state);
    let context = EngineContext::new();
    let mut out = Vec::new();
    let mut err = Vec::new();

    let result = init_containers(
        InitParams {
            engine: engine.as_ref(),
            context: &context,
            runtime_handle: runtime.handle(),
            ids,
            options,
        },
        &mut out,
        &mut err,
    );

    init_state
        .stdout
        .set(String::from_utf8_lossy(&out).into_owned());
    init_state
        .stderr
        .set(String::from_utf8_lossy(&err).into_owned());
    init_state.result.set(match result {
        Ok(outcome) => InitResult::Ok(outcome),
        Err(error) => InitResult::Err {
            kind: error_kind(&error),
            message: error.to_string(),
        },
    });
    Ok(())
}

#[given("the engine runs in {mode} mode")]
fn given_engine_mode(init_state: &InitState, mode: String) -> StepResult<()> {
    let parsed = match mode.as_str() {
        "local" => EngineMode::Local,
        "remote" => EngineMode::Remote,
        other => return Err(format!("unknown engine mode: {other}")),
    };
    init_state.mode.set(parsed);
    Ok(())
}

#[given("container {id} was created at {created} and is {state}")]
fn given_container(init_state: &InitState, id: String, created: i64, state: String) {
    let mut containers = init_state.containers.get().unwrap_or_default();
    containers.push(ScriptedContainer { id, created, state });
    init_state.containers.set(containers);
}

#[given("the engine knows no containers")]
fn given_no_containers(init_state: &InitState) {
    init_state.containers.set(Vec::new());
}

#[given("the remote service drops the connection at {id}")]
fn given_transport_break(init_state: &InitState, id: String) {
    init_state.transport_break_at.set(id);
}

#[given("the remote service is unreachable")]
fn given_unreachable(init_state: &InitState) {
    init_state.unreachable.set(true);
}

#[when("init is requested for {ids}")]
fn when_init_for_ids(init_state: &InitState, ids: String) -> StepResult<()> {
    run_init(init_state, split_ids(&ids), SelectionOptions::default())
}

#[when("init is requested with --all")]
fn when_init_all(init_state: &InitState) -> StepResult<()> {
    run_init(
        init_state,
        Vec::new(),
        SelectionOptions {
            all: true,
            latest: false,
        },
    )
}

#[when("init is requested with --latest")]
fn when_init_latest(init_state: &InitState) -> StepResult<()> {
    run_init(
        init_state,
        Vec::new(),
        SelectionOptions {
            all: false,
            latest: true,
        },
    )
}

#[when("init is requested with --all and --latest")]
fn when_init_all_and_latest(init_state: &InitState) -> StepResult<()> {
    run_init(
        init_state,
        Vec::new(),
        SelectionOptions {
            all: true,
            latest: true,
        },
    )
}
