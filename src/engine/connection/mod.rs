//! Socket resolution and container engine connection.
//!
//! Resolves the engine endpoint for the bound mode from configuration,
//! environment variables, and platform defaults, then builds a `Bollard`
//! client for it. Building a client does not contact the engine; reachability
//! is established by the first request.

mod error_classification;

use bollard::Docker;

use crate::error::{ConfigError, PodinitError};

pub(crate) use error_classification::{EngineFailure, classify_engine_error, is_transport_error};

/// Environment variable names checked in fallback order for the local engine.
const FALLBACK_ENV_VARS: &[&str] = &["DOCKER_HOST", "CONTAINER_HOST", "PODMAN_HOST"];

/// Environment variable naming the remote service when config does not.
const REMOTE_ENV_VAR: &str = "CONTAINER_HOST";

/// Client-side request timeout in seconds for Docker/Podman API calls.
const CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Default socket path for Unix platforms.
#[cfg(unix)]
const DEFAULT_SOCKET: &str = "unix:///var/run/docker.sock";

/// Default socket path for Windows platforms.
#[cfg(windows)]
const DEFAULT_SOCKET: &str = "npipe:////./pipe/docker_engine";

/// Resolves container engine endpoints from environment variables.
///
/// # Type Parameters
///
/// * `E` - An environment provider implementing the `mockable::Env` trait,
///   allowing for testable environment variable access.
pub struct SocketResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> SocketResolver<'a, E> {
    /// Creates a new socket resolver with the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Resolves the local socket endpoint from fallback environment variables.
    ///
    /// Checks `DOCKER_HOST`, `CONTAINER_HOST`, then `PODMAN_HOST`. Returns
    /// `None` if no fallback variable is set or all are empty.
    #[must_use]
    pub fn resolve_from_env(&self) -> Option<String> {
        FALLBACK_ENV_VARS
            .iter()
            .filter_map(|var_name| self.env.string(var_name))
            .find(|value| !value.is_empty())
    }

    /// Resolves the remote service URL from `CONTAINER_HOST`.
    #[must_use]
    pub fn remote_from_env(&self) -> Option<String> {
        self.env
            .string(REMOTE_ENV_VAR)
            .filter(|value| !value.is_empty())
    }

    /// Returns the platform default socket path.
    #[must_use]
    pub const fn default_socket() -> &'static str {
        DEFAULT_SOCKET
    }
}

/// Classifies socket endpoint types for connection handling.
enum SocketType {
    /// Unix socket or Windows named pipe with explicit scheme.
    Socket,
    /// HTTP, HTTPS, or TCP endpoint (TCP is rewritten to HTTP).
    Http,
    /// Bare path without scheme prefix.
    BarePath,
}

impl SocketType {
    fn is_socket_scheme(socket: &str) -> bool {
        socket.starts_with("unix://") || socket.starts_with("npipe://")
    }

    fn is_http_scheme(socket: &str) -> bool {
        socket.starts_with("tcp://")
            || socket.starts_with("http://")
            || socket.starts_with("https://")
    }

    fn classify(socket: &str) -> Self {
        match (Self::is_socket_scheme(socket), Self::is_http_scheme(socket)) {
            (true, _) => Self::Socket,
            (_, true) => Self::Http,
            _ => Self::BarePath,
        }
    }
}

/// Builds `Bollard` clients for local and remote engines.
pub struct EngineConnector;

impl EngineConnector {
    /// Connect to the container engine at the specified endpoint.
    ///
    /// Supports `unix://`, `npipe://`, `tcp://` (treated as HTTP), `http://`,
    /// `https://`, and bare paths. Bare paths starting with `\\` or `//` are
    /// treated as Windows named pipes; all others as Unix sockets.
    ///
    /// # Errors
    ///
    /// Returns a `ContainerError` classified from the `Bollard` failure:
    /// `SocketNotFound`, `PermissionDenied`, or `ConnectionFailed`.
    pub fn connect(socket: &str) -> Result<Docker, PodinitError> {
        let (socket_uri, connected) = match SocketType::classify(socket) {
            SocketType::Socket => (
                socket.to_owned(),
                Docker::connect_with_socket(
                    socket,
                    CONNECTION_TIMEOUT_SECS,
                    bollard::API_DEFAULT_VERSION,
                ),
            ),
            SocketType::Http => {
                // Bollard only understands http:// and https://.
                let http_socket = socket.replacen("tcp://", "http://", 1);
                let client = Docker::connect_with_http(
                    &http_socket,
                    CONNECTION_TIMEOUT_SECS,
                    bollard::API_DEFAULT_VERSION,
                );
                (http_socket, client)
            }
            SocketType::BarePath => {
                let uri = Self::normalize_bare_path(socket);
                let client = Docker::connect_with_socket(
                    &uri,
                    CONNECTION_TIMEOUT_SECS,
                    bollard::API_DEFAULT_VERSION,
                );
                (uri, client)
            }
        };

        connected.map_err(|error| {
            PodinitError::from(error_classification::classify_connection_error(
                &error,
                &socket_uri,
            ))
        })
    }

    fn normalize_bare_path(path: &str) -> String {
        if path.starts_with("\\\\") || path.starts_with("//") {
            format!("npipe://{path}")
        } else {
            format!("unix://{path}")
        }
    }

    /// Resolves the local socket endpoint without establishing a connection.
    ///
    /// Resolution order:
    /// 1. `config_socket` (from CLI, config file, or `PODINIT_ENGINE_SOCKET`)
    /// 2. `DOCKER_HOST`, `CONTAINER_HOST`, `PODMAN_HOST` (via resolver)
    /// 3. Platform default socket
    #[must_use]
    pub fn resolve_socket<E: mockable::Env>(
        config_socket: Option<&str>,
        resolver: &SocketResolver<'_, E>,
    ) -> String {
        config_socket
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| resolver.resolve_from_env())
            .unwrap_or_else(|| SocketResolver::<E>::default_socket().to_owned())
    }

    /// Resolves the remote service URL.
    ///
    /// Uses `engine.remote_url` when set, falling back to `CONTAINER_HOST`.
    /// There is no platform default: remote mode must be pointed somewhere.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when neither source is set.
    pub fn resolve_remote_url<E: mockable::Env>(
        config_url: Option<&str>,
        resolver: &SocketResolver<'_, E>,
    ) -> Result<String, PodinitError> {
        config_url
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| resolver.remote_from_env())
            .ok_or_else(|| {
                PodinitError::from(ConfigError::MissingRequired {
                    field: String::from("engine.remote_url"),
                })
            })
    }
}
