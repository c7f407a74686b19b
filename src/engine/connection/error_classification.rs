//! Classification of `Bollard` failures.
//!
//! Connection failures become the most specific `ContainerError` the socket
//! URI allows. Request failures are split into those the engine answered
//! for a container and those whose transport never completed.

use std::io::ErrorKind;
use std::path::Path;

use bollard::errors::Error as BollardError;

use crate::error::ContainerError;

/// Filesystem path of a `unix://` or `npipe://` socket URI.
pub(super) fn extract_socket_path(socket_uri: &str) -> Option<&Path> {
    socket_uri
        .strip_prefix("unix://")
        .or_else(|| socket_uri.strip_prefix("npipe://"))
        .map(Path::new)
}

/// Classify a failure to connect to `socket_uri`.
///
/// Permission and not-found errors name the socket path when the URI has
/// one. Everything else is `ConnectionFailed`.
pub(super) fn classify_connection_error(
    error: &BollardError,
    socket_uri: &str,
) -> ContainerError {
    let kind = match error {
        BollardError::SocketNotFoundError(_) => Some(ErrorKind::NotFound),
        BollardError::IOError { err } => {
            Some(io_error_kind_in_chain(err).unwrap_or_else(|| err.kind()))
        }
        other => io_error_kind_in_chain(other),
    };
    match (kind, extract_socket_path(socket_uri)) {
        (Some(ErrorKind::PermissionDenied), Some(path)) => ContainerError::PermissionDenied {
            path: path.to_path_buf(),
        },
        (Some(ErrorKind::NotFound), Some(path)) => ContainerError::SocketNotFound {
            path: path.to_path_buf(),
        },
        _ => ContainerError::ConnectionFailed {
            message: error.to_string(),
        },
    }
}

/// Where an engine request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EngineFailure {
    /// The engine answered and rejected the request for this container.
    Target(ContainerError),
    /// The request never completed a round trip.
    Transport(String),
}

impl EngineFailure {
    /// Collapse the failure into a per-container error.
    ///
    /// Used where transport problems are still reported per target.
    pub(crate) fn into_container_error(self) -> ContainerError {
        match self {
            Self::Target(error) => error,
            Self::Transport(message) => ContainerError::ConnectionFailed { message },
        }
    }
}

/// Return whether a `Bollard` request error means no response was received.
pub(crate) const fn is_transport_error(error: &BollardError) -> bool {
    !matches!(error, BollardError::DockerResponseServerError { .. })
}

/// Classify a `Bollard` request error raised while acting on `container`.
///
/// Any HTTP response from the engine is a per-container failure: `404`
/// becomes `NotFound` and everything else `InitFailed`. Errors without a
/// response (I/O, connection, timeouts, malformed payloads) are transport
/// failures.
pub(crate) fn classify_engine_error(error: &BollardError, container: &str) -> EngineFailure {
    match error {
        BollardError::DockerResponseServerError {
            status_code: 404, ..
        } => EngineFailure::Target(ContainerError::NotFound {
            container: container.to_owned(),
        }),
        BollardError::DockerResponseServerError { message, .. } => {
            EngineFailure::Target(ContainerError::InitFailed {
                container: container.to_owned(),
                message: message.clone(),
            })
        }
        other => EngineFailure::Transport(other.to_string()),
    }
}

/// First `io::Error` kind found below `error` in its source chain.
fn io_error_kind_in_chain(error: &dyn std::error::Error) -> Option<ErrorKind> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = error.source();
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            return Some(io_err.kind());
        }
        current = err.source();
    }
    None
}
