//! Semantic error types for the podinit application.
//!
//! Errors fall into layers that mirror how far a request got before failing:
//!
//! - [`SelectionError`]: the selection modifiers were contradictory or could
//!   not be resolved. Raised before any container is touched.
//! - [`DispatchError`]: the engine call as a whole could not be completed.
//!   No per-container reports are produced.
//! - [`ContainerError`]: a single container failed to initialise. Carried
//!   inside its report and never aborts sibling targets.
//!
//! Semantic enums (via `thiserror`) are used throughout the library, while
//! opaque errors (`eyre::Report`) are reserved for the binary boundary.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::registry::{CommandName, EngineMode};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised while validating or resolving a container selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// More than one selection mode was requested at once.
    #[error("{first} and {second} cannot be used together")]
    Conflict {
        /// The first conflicting selection mode, as the user spelled it.
        first: &'static str,
        /// The second conflicting selection mode.
        second: &'static str,
    },

    /// Neither identifiers nor a selection modifier were supplied.
    #[error("you must provide at least one name or id")]
    Empty,

    /// `--latest` was requested but the engine knows no containers.
    #[error("no containers to select: the engine reports none")]
    NoContainers,
}

/// Errors that abort an engine call as a whole.
///
/// When one of these is returned, no per-container reports exist and callers
/// must not assume any target was processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The remote engine could not be reached or dropped the request.
    #[error("failed to reach remote container engine: {message}")]
    Transport {
        /// A description of the transport failure.
        message: String,
    },

    /// The remote engine did not complete the request in time.
    #[error("remote container engine did not respond within {seconds} seconds")]
    Timeout {
        /// The timeout that elapsed, in seconds.
        seconds: u64,
    },

    /// The caller cancelled the request while it was in flight.
    #[error("request cancelled before the engine completed it")]
    Cancelled,

    /// The request itself was malformed.
    #[error("invalid initialisation request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected.
        reason: String,
    },

    /// The engine failed while producing the container snapshot.
    #[error("container engine failed to list containers: {message}")]
    Engine {
        /// A description of the engine failure.
        message: String,
    },

    /// Selection could not be resolved against the engine's containers.
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Errors that can occur for an individual container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// Failed to connect to the container engine socket.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The container engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: PathBuf,
    },

    /// Permission denied when accessing the container engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: PathBuf,
    },

    /// No container matches the requested name or ID.
    #[error("no container with name or ID '{container}' found")]
    NotFound {
        /// The identifier that did not resolve.
        container: String,
    },

    /// The container's state does not permit initialisation.
    #[error("container '{container}' is {state}: cannot initialise")]
    InvalidState {
        /// The container identifier.
        container: String,
        /// The state reported by the engine.
        state: String,
    },

    /// The engine rejected the initialisation of a container.
    #[error("failed to initialise container '{container}': {message}")]
    InitFailed {
        /// The container identifier.
        container: String,
        /// A description of the failure.
        message: String,
    },

    /// Failed to create the async runtime used for synchronous wrappers.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// A description of the runtime creation failure.
        message: String,
    },
}

/// Errors raised by the command mode registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A command was registered under a mode it does not support.
    #[error("command '{command}' does not support {mode} mode")]
    UnsupportedMode {
        /// The rejected command.
        command: CommandName,
        /// The registry's bound mode.
        mode: EngineMode,
    },

    /// The same command was registered twice.
    #[error("command '{command}' is already registered")]
    Duplicate {
        /// The duplicated command.
        command: CommandName,
    },

    /// The command is not available in the bound mode.
    #[error("command '{command}' is not available in {mode} mode")]
    Unavailable {
        /// The requested command.
        command: CommandName,
        /// The registry's bound mode.
        mode: EngineMode,
    },
}

/// Top-level error type for the podinit application.
///
/// At the application boundary (main.rs), these errors are converted to
/// `eyre::Report` for human-readable error reporting.
#[derive(Debug, Error)]
pub enum PodinitError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The selection modifiers were invalid.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The engine call could not be completed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// An error occurred while talking to the container engine.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// The command is not registered for the bound mode.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Writing command output failed.
    #[error("failed to write command output: {0}")]
    Output(#[from] std::io::Error),
}

/// A specialised `Result` type for podinit operations.
pub type Result<T> = std::result::Result<T, PodinitError>;
