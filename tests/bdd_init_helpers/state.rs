//! Scenario state for init behavioural tests.

use podinit::api::CommandOutcome;
use podinit::registry::EngineMode;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// A container the scripted engine knows about.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedContainer {
    pub(crate) id: String,
    pub(crate) created: i64,
    pub(crate) state: String,
}

/// High-level outcome from an init call.
#[derive(Debug, Clone)]
pub(crate) enum InitResult {
    /// The command ran and produced an outcome.
    Ok(CommandOutcome),
    /// The command failed as a whole.
    Err {
        /// Short name of the error variant.
        kind: &'static str,
        /// Rendered error message.
        message: String,
    },
}

#[derive(Default, ScenarioState)]
pub(crate) struct InitState {
    pub(crate) mode: Slot<EngineMode>,
    pub(crate) containers: Slot<Vec<ScriptedContainer>>,
    pub(crate) transport_break_at: Slot<String>,
    pub(crate) unreachable: Slot<bool>,
    pub(crate) result: Slot<InitResult>,
    pub(crate) stdout: Slot<String>,
    pub(crate) stderr: Slot<String>,
}

#[fixture]
pub(crate) fn init_state() -> InitState {
    let state = InitState::default();
    state.mode.set(EngineMode::Local);
    state.containers.set(Vec::new());
    state.unreachable.set(false);
    state
}
