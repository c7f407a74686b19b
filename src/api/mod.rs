//! Orchestration API for podinit commands.
//!
//! This module provides the public orchestration function for each command.
//! These functions hold the flow that sits between argument parsing and the
//! engine, making it available to both the CLI adapter and library
//! embedders.
//!
//! Functions accept library-owned types (not clap types) and return
//! [`crate::error::Result<CommandOutcome>`]. They write only to the sinks
//! they are given and never call `std::process::exit`.

mod init;

pub use init::{InitParams, init_containers};

/// Outcome of a podinit command.
///
/// Commands return either outright success or a failure count that the CLI
/// adapter maps to a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Every target succeeded, or there were no targets (exit code 0).
    Success,
    /// At least one target failed.
    Failed {
        /// Number of targets that failed.
        failures: usize,
    },
}

impl CommandOutcome {
    /// Return whether the command succeeded.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}
