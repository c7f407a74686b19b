//! Configuration system for podinit.
//!
//! This module provides the configuration structures and CLI definitions for
//! podinit. Layers are merged with the `ortho_config` crate. Precedence: CLI
//! flags override environment variables, which override configuration files,
//! which override defaults.
//!
//! The configuration file is expected at `~/.config/podinit/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! engine_socket = "unix:///run/user/1000/podman/podman.sock"
//! log_level = "info"
//!
//! [engine]
//! mode = "remote"
//! remote_url = "tcp://build-host:2375"
//! timeout_secs = 30
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, InitArgs};
pub use loader::{env_var_names, load_config};
pub use types::{AppConfig, DEFAULT_REMOTE_TIMEOUT_SECS, EngineConfig};
