//! Layered configuration loading.
//!
//! Layers are pushed onto an `ortho_config` [`MergeComposer`] by hand, lowest
//! first: defaults, the configuration file, `PODINIT_*` environment
//! variables, then CLI flags. The `Cli` struct owns subcommand parsing, so the
//! derive's own `load()` is not used.
//!
//! Typed environment variables are checked before merging. A value such as
//! `PODINIT_ENGINE_TIMEOUT_SECS=soon` or `PODINIT_ENGINE_MODE=hybrid` fails
//! loading instead of being ignored.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};
use crate::registry::EngineMode;

/// How a raw environment value is checked and converted.
#[derive(Clone, Copy)]
enum EnvValue {
    /// Taken verbatim.
    Text,
    /// One of the listed words, compared case-insensitively.
    OneOf(&'static [&'static str]),
    /// A base-10 `u64`.
    Unsigned,
}

/// An environment variable and the config path it feeds.
struct EnvBinding {
    name: &'static str,
    path: &'static [&'static str],
    kind: EnvValue,
}

const ENV_BINDINGS: &[EnvBinding] = &[
    EnvBinding {
        name: "PODINIT_ENGINE_SOCKET",
        path: &["engine_socket"],
        kind: EnvValue::Text,
    },
    EnvBinding {
        name: "PODINIT_LOG_LEVEL",
        path: &["log_level"],
        kind: EnvValue::Text,
    },
    EnvBinding {
        name: "PODINIT_ENGINE_MODE",
        path: &["engine", "mode"],
        kind: EnvValue::OneOf(&["local", "remote"]),
    },
    EnvBinding {
        name: "PODINIT_ENGINE_REMOTE_URL",
        path: &["engine", "remote_url"],
        kind: EnvValue::Text,
    },
    EnvBinding {
        name: "PODINIT_ENGINE_TIMEOUT_SECS",
        path: &["engine", "timeout_secs"],
        kind: EnvValue::Unsigned,
    },
];

/// Names of every environment variable the loader reads.
///
/// Tests use this to clear the environment without keeping their own list.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_BINDINGS.iter().map(|binding| binding.name).collect()
}

/// Load configuration with full layer precedence.
///
/// # Errors
///
/// Returns `ConfigError::ParseError` for a missing `--config` path or an
/// unreadable or malformed file,
/// `ConfigError::InvalidValue` for a bad typed environment variable or a
/// zero `engine.timeout_secs`, and `ConfigError::OrthoConfig` when the
/// merged layers do not deserialise.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    if let Some(path) = discover_config_file(cli)? {
        let file = read_config_file(&path)?;
        composer.push_file(file, Some(path));
    }

    if let Some(environment) = environment_layer()? {
        composer.push_environment(environment);
    }

    if let Some(overrides) = cli_layer(cli) {
        composer.push_cli(overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    validate(&config)?;
    Ok(config)
}

/// Pick the configuration file: the `--config` path when given, otherwise the
/// first existing candidate of the discovery chain (`PODINIT_CONFIG_PATH`,
/// dotfile, XDG).
///
/// An explicit `--config` path that does not exist is an error.
fn discover_config_file(cli: &Cli) -> Result<Option<Utf8PathBuf>> {
    if let Some(explicit) = &cli.config {
        if !explicit.exists() {
            return Err(ConfigError::ParseError {
                message: format!("configuration file not found: {explicit}"),
            }
            .into());
        }
        return Ok(Some(explicit.clone()));
    }
    let discovered = ConfigDiscovery::builder("podinit")
        .env_var("PODINIT_CONFIG_PATH")
        .config_file_name("config.toml")
        .dotfile_name(".podinit.toml")
        .build()
        .candidates()
        .into_iter()
        .filter(|candidate| candidate.exists())
        .find_map(|candidate| Utf8PathBuf::try_from(candidate).ok());
    Ok(discovered)
}

/// Read a TOML file through a capability handle on its parent directory.
fn read_config_file(path: &Utf8Path) -> Result<Value> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;
    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    toml::from_str::<Value>(&content).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        }
        .into()
    })
}

/// Build the environment layer, or `None` when no variable is set.
fn environment_layer() -> Result<Option<Value>> {
    let mut root = Map::new();
    for binding in ENV_BINDINGS {
        let Ok(raw) = std::env::var(binding.name) else {
            continue;
        };
        let value = convert_env_value(binding, raw)?;
        insert_at_path(&mut root, binding.path, value);
    }
    Ok((!root.is_empty()).then_some(Value::Object(root)))
}

fn convert_env_value(binding: &EnvBinding, raw: String) -> Result<Value> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        field: binding.name.to_owned(),
        reason,
    };
    match binding.kind {
        EnvValue::Text => Ok(Value::String(raw)),
        EnvValue::OneOf(allowed) => {
            let word = raw.trim().to_ascii_lowercase();
            if allowed.contains(&word.as_str()) {
                Ok(Value::String(word))
            } else {
                Err(invalid(format!(
                    "expected one of {}, got '{raw}'",
                    allowed.join(", ")
                ))
                .into())
            }
        }
        EnvValue::Unsigned => raw
            .parse::<u64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| invalid(format!("expected unsigned integer, got '{raw}'")).into()),
    }
}

/// Build the CLI layer, or `None` when no global flag was given.
fn cli_layer(cli: &Cli) -> Option<Value> {
    let mut root = Map::new();
    if let Some(socket) = &cli.engine_socket {
        insert_at_path(&mut root, &["engine_socket"], Value::String(socket.clone()));
    }
    if cli.remote {
        insert_at_path(
            &mut root,
            &["engine", "mode"],
            Value::String(EngineMode::Remote.to_string()),
        );
    }
    if let Some(level) = &cli.log_level {
        insert_at_path(&mut root, &["log_level"], Value::String(level.clone()));
    }
    (!root.is_empty()).then_some(Value::Object(root))
}

/// Place `value` at `path`, creating intermediate tables.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&leaf, tables)) = path.split_last() else {
        return;
    };
    let mut current = root;
    for &table in tables {
        let Some(next) = current
            .entry(table.to_owned())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
        else {
            return;
        };
        current = next;
    }
    current.insert(leaf.to_owned(), value);
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.engine.timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: String::from("engine.timeout_secs"),
            reason: String::from("must be greater than zero"),
        }
        .into());
    }
    Ok(())
}
