//! Prepare containers for start without starting them.
//!
//! `podinit` initialises one or more containers through a container engine
//! that is either driven in-process or reached over the network. Both modes
//! sit behind one engine facade, so command code never branches on where
//! the engine lives.
//!
//! # Flow
//!
//! Positional identifiers and the `--all`/`--latest` modifiers become a
//! validated [`selection::Selection`]. The [`registry::ModeRegistry`] decides
//! whether the command may run in the bound mode, and [`engine::bind_engine`]
//! picks the backend. The engine returns one [`engine::Report`] per target,
//! which [`report`] folds into output lines and a final outcome.
//!
//! # Modules
//!
//! - [`api`]: Command orchestration shared by the CLI and embedders
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`engine`]: Engine facade, local and remote backends, and endpoint resolution
//! - [`error`]: Semantic error types for the application
//! - [`registry`]: Command availability per execution mode
//! - [`report`]: Result aggregation and error reporting
//! - [`selection`]: Container selection and resolution

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod report;
pub mod selection;
