//! Command-line argument definitions for podinit.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use crate::selection::SelectionOptions;

/// Command-line interface for podinit.
#[derive(Debug, Parser)]
#[command(name = "podinit")]
#[command(
    author,
    version,
    about = "Prepare containers for start without starting them"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Container engine socket path or URL.
    #[arg(long, global = true)]
    pub engine_socket: Option<String>,

    /// Forward requests to the remote container service.
    #[arg(long, global = true)]
    pub remote: bool,

    /// Log filter directive, for example `debug` or `podinit=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize one or more containers.
    Init(InitArgs),
}

/// Arguments for the `init` subcommand.
#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Container names or IDs to initialize.
    pub containers: Vec<String>,

    /// Initialize all containers.
    #[arg(short, long)]
    pub all: bool,

    /// Act on the most recently created container.
    #[arg(short, long, hide = true)]
    pub latest: bool,
}

impl InitArgs {
    /// Return the selection modifiers given on the command line.
    #[must_use]
    pub const fn options(&self) -> SelectionOptions {
        SelectionOptions {
            all: self.all,
            latest: self.latest,
        }
    }
}
