//! Shared fixtures and helper functions for config tests.

use crate::config::{AppConfig, DEFAULT_REMOTE_TIMEOUT_SECS};
use crate::registry::EngineMode;
use ortho_config::MergeComposer;
use rstest::fixture;
use std::sync::Arc;

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        engine_socket = "unix:///run/podman/podman.sock"
        log_level = "debug"

        [engine]
        mode = "remote"
        remote_url = "tcp://build-host:2375"
        timeout_secs = 5
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` parsed from a minimal TOML example.
#[fixture]
pub fn app_config_from_partial_toml() -> AppConfig {
    let toml = r#"
        engine_socket = "unix:///tmp/docker.sock"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert!(
        config.engine_socket.is_none(),
        "engine_socket should be None"
    );
    assert!(config.log_level.is_none(), "log_level should be None");
    assert_eq!(
        config.engine.mode,
        EngineMode::Local,
        "engine.mode should be local"
    );
    assert!(
        config.engine.remote_url.is_none(),
        "engine.remote_url should be None"
    );
    assert_eq!(
        config.engine.timeout_secs, DEFAULT_REMOTE_TIMEOUT_SECS,
        "engine.timeout_secs should use the default"
    );
}

/// Helper: builds a `MergeComposer` with defaults, file, and env layers.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "engine_socket": "unix:///from/file.sock",
            "engine": { "remote_url": "tcp://file-host:2375" }
        }),
        None,
    );

    composer.push_environment(json!({
        "engine_socket": "unix:///from/env.sock"
    }));

    Ok(composer)
}
