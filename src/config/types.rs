//! Configuration data types for podinit.

use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::registry::EngineMode;

/// Default bound on a remote engine call, in seconds.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Engine binding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which backend serves commands.
    pub mode: EngineMode,

    /// Remote service URL, used in remote mode.
    pub remote_url: Option<String>,

    /// Upper bound on one remote call, in seconds.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::Local,
            remote_url: None,
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `PODINIT_CONFIG_PATH` environment variable
/// 2. `.podinit.toml` in the current working directory
/// 3. `.podinit.toml` in the home directory
/// 4. `~/.config/podinit/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "PODINIT",
    post_merge_hook,
    discovery(
        app_name = "podinit",
        env_var = "PODINIT_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".podinit.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The local container engine socket path or URL.
    pub engine_socket: Option<String>,

    /// Engine binding configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub engine: EngineConfig,

    /// Log filter directive.
    pub log_level: Option<String>,
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Blank strings from any layer mean "unset".
        for field in [
            &mut self.engine_socket,
            &mut self.engine.remote_url,
            &mut self.log_level,
        ] {
            if field.as_deref().is_some_and(|value| value.trim().is_empty()) {
                *field = None;
            }
        }
        Ok(())
    }
}
