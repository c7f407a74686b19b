//! `podinit` application entry point.
//!
//! This binary initialises containers through a local or remote container
//! engine. It uses `eyre` for opaque error handling at the application
//! boundary, converting domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/podinit/config.toml` or path from `PODINIT_CONFIG_PATH`)
//! 3. Environment variables (`PODINIT_*`)
//! 4. Command-line arguments

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use eyre::Report;
use podinit::api::{CommandOutcome, InitParams, init_containers};
use podinit::config::{AppConfig, Cli, Commands, InitArgs, load_config};
use podinit::engine::{EngineContext, bind_engine};
use podinit::error::{ConfigError, ContainerError, PodinitError, Result as PodinitResult};
use podinit::registry::{CommandName, ModeRegistry};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status for failed commands, following container tool convention.
const EXIT_FAILURE: u8 = 125;

/// Application entry point.
///
/// Loads configuration, binds the engine for the configured mode, then
/// dispatches to the subcommand handler. Every failure exits with status
/// 125.
fn main() -> ExitCode {
    // Parse CLI first (for subcommand dispatch and global options).
    let cli = Cli::parse();

    let outcome = load_config(&cli).and_then(|config| {
        init_tracing(&config)?;
        run(&cli, &config)
    });

    let code = exit_code(&outcome);
    if let Err(error) = outcome {
        report_error(&Report::from(error));
    }
    ExitCode::from(code)
}

/// Map a command result to the process exit status.
const fn exit_code(outcome: &PodinitResult<CommandOutcome>) -> u8 {
    match outcome {
        Ok(result) if result.is_success() => 0,
        Ok(_) | Err(_) => EXIT_FAILURE,
    }
}

/// Install the stderr subscriber.
fn init_tracing(config: &AppConfig) -> PodinitResult<()> {
    let filter = log_filter(config.log_level.as_deref())?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Build the log filter from `--log-level` or `log_level` in config, then
/// `RUST_LOG`, then `warn`.
///
/// A configured directive that does not parse is a configuration error.
fn log_filter(level: Option<&str>) -> PodinitResult<EnvFilter> {
    let Some(directive) = level else {
        let fallback = EnvFilter::try_from_default_env();
        return Ok(fallback.unwrap_or_else(|_| EnvFilter::new("warn")));
    };
    EnvFilter::try_new(directive).map_err(|error| {
        PodinitError::from(ConfigError::InvalidValue {
            field: String::from("log_level"),
            reason: error.to_string(),
        })
    })
}

#[expect(clippy::print_stderr, reason = "the CLI boundary reports errors")]
fn report_error(error: &Report) {
    eprintln!("Error: {error}");
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(cli: &Cli, config: &AppConfig) -> PodinitResult<CommandOutcome> {
    let registry = ModeRegistry::bootstrap(config.engine.mode)?;

    match &cli.command {
        Commands::Init(args) => {
            let descriptor = registry.lookup(CommandName::Init)?;
            debug!(
                command = %descriptor.name(),
                about = descriptor.about(),
                mode = %registry.mode(),
                "command available"
            );
            init(&registry, config, args)
        }
    }
}

/// Initialise the selected containers.
fn init(
    registry: &ModeRegistry,
    config: &AppConfig,
    args: &InitArgs,
) -> PodinitResult<CommandOutcome> {
    let runtime = tokio::runtime::Runtime::new().map_err(|error| {
        PodinitError::from(ContainerError::RuntimeCreationFailed {
            message: error.to_string(),
        })
    })?;

    let env = mockable::DefaultEnv::new();
    let engine = bind_engine(registry.mode(), config, &env)?;
    debug!(mode = %engine.mode(), "engine bound");

    let context = EngineContext::new();
    let interrupt = context.clone();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let outcome = init_containers(
        InitParams {
            engine: engine.as_ref(),
            context: &context,
            runtime_handle: runtime.handle(),
            ids: args.containers.clone(),
            options: args.options(),
        },
        &mut out,
        &mut err,
    )?;
    out.flush()?;
    Ok(outcome)
}
