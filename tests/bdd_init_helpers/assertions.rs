//! Assertion helpers for init behavioural tests.

use podinit::api::CommandOutcome;
use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{InitResult, InitState};

fn result(init_state: &InitState) -> StepResult<InitResult> {
    init_state
        .result
        .get()
        .ok_or_else(|| String::from("result should be set"))
}

fn stdout(init_state: &InitState) -> StepResult<String> {
    init_state
        .stdout
        .get()
        .ok_or_else(|| String::from("stdout should be captured"))
}

#[then("stdout lists {ids}")]
fn stdout_lists(init_state: &InitState, ids: String) -> StepResult<()> {
    let output = stdout(init_state)?;
    let listed: Vec<&str> = output.lines().collect();
    let expected: Vec<&str> = ids.split(',').collect();
    if listed == expected {
        Ok(())
    } else {
        Err(format!("expected stdout {expected:?}, got {listed:?}"))
    }
}

#[then("stdout is empty")]
fn stdout_is_empty(init_state: &InitState) -> StepResult<()> {
    let output = stdout(init_state)?;
    if output.is_empty() {
        Ok(())
    } else {
        Err(format!("expected empty stdout, got: {output}"))
    }
}

#[then("stderr reports a failure for {id}")]
fn stderr_reports_failure(init_state: &InitState, id: String) -> StepResult<()> {
    let errors = init_state
        .stderr
        .get()
        .ok_or_else(|| String::from("stderr should be captured"))?;
    let named = errors
        .lines()
        .any(|line| line.starts_with("Error: ") && line.contains(&id));
    if named {
        Ok(())
    } else {
        Err(format!("expected an Error line naming {id}, got: {errors}"))
    }
}

#[then("the command succeeds")]
fn command_succeeds(init_state: &InitState) -> StepResult<()> {
    match result(init_state)? {
        InitResult::Ok(CommandOutcome::Success) => Ok(()),
        other => Err(format!("expected Success, got {other:?}")),
    }
}

#[then("the command fails with {count} failures")]
fn command_fails_with(init_state: &InitState, count: usize) -> StepResult<()> {
    match result(init_state)? {
        InitResult::Ok(CommandOutcome::Failed { failures }) if failures == count => Ok(()),
        other => Err(format!("expected {count} failures, got {other:?}")),
    }
}

#[then("the call fails with a {kind} error")]
fn call_fails_with(init_state: &InitState, kind: String) -> StepResult<()> {
    match result(init_state)? {
        InitResult::Err {
            kind: actual,
            message,
        } if actual == kind => {
            if message.is_empty() {
                Err(String::from("error message should not be empty"))
            } else {
                Ok(())
            }
        }
        other => Err(format!("expected a {kind} error, got {other:?}")),
    }
}
