//! Command mode registry.
//!
//! The registry is built once during process bootstrap, bound to the single
//! [`EngineMode`] the process runs in, and read-only afterwards. Commands
//! that do not support the bound mode are rejected at registration time, so
//! a later [`ModeRegistry::lookup`] is the only availability check callers
//! need.

use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// The execution backend a process is bound to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Talk to the container engine on this host.
    #[default]
    Local,
    /// Talk to a container engine through a remote transport.
    Remote,
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// Commands known to podinit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandName {
    /// `podinit init`.
    Init,
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
        }
    }
}

/// Static description of a command and the modes it can run in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    name: CommandName,
    supported_modes: &'static [EngineMode],
    about: &'static str,
}

impl CommandDescriptor {
    /// Create a descriptor.
    #[must_use]
    pub const fn new(
        name: CommandName,
        supported_modes: &'static [EngineMode],
        about: &'static str,
    ) -> Self {
        Self {
            name,
            supported_modes,
            about,
        }
    }

    /// Return the command name.
    #[must_use]
    pub const fn name(&self) -> CommandName {
        self.name
    }

    /// Return the one-line command summary.
    #[must_use]
    pub const fn about(&self) -> &'static str {
        self.about
    }

    /// Return whether the command can run under `mode`.
    #[must_use]
    pub fn supports(&self, mode: EngineMode) -> bool {
        self.supported_modes.contains(&mode)
    }
}

/// Built-in command table.
pub const BUILTIN_COMMANDS: &[CommandDescriptor] = &[CommandDescriptor::new(
    CommandName::Init,
    &[EngineMode::Local, EngineMode::Remote],
    "Initialize one or more containers",
)];

/// Registration table bound to one engine mode.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    mode: EngineMode,
    commands: BTreeMap<CommandName, CommandDescriptor>,
}

impl ModeRegistry {
    /// Create an empty registry bound to `mode`.
    #[must_use]
    pub const fn new(mode: EngineMode) -> Self {
        Self {
            mode,
            commands: BTreeMap::new(),
        }
    }

    /// Create a registry bound to `mode` holding every built-in command that
    /// supports it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Duplicate` when the built-in table lists a
    /// command twice.
    pub fn bootstrap(mode: EngineMode) -> Result<Self, RegistryError> {
        Self::bootstrap_from(mode, BUILTIN_COMMANDS)
    }

    /// Create a registry bound to `mode` by registering each entry of
    /// `table`.
    ///
    /// Entries that do not support `mode` are skipped, so they surface as
    /// [`RegistryError::Unavailable`] on lookup.
    fn bootstrap_from(
        mode: EngineMode,
        table: &[CommandDescriptor],
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new(mode);
        for descriptor in table {
            match registry.register(descriptor.clone()) {
                Ok(()) | Err(RegistryError::UnsupportedMode { .. }) => {}
                Err(error) => return Err(error),
            }
        }
        Ok(registry)
    }

    /// Register a command.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnsupportedMode` when the descriptor does not
    /// list the registry's mode, and `RegistryError::Duplicate` when the
    /// command is already registered.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        if !descriptor.supports(self.mode) {
            return Err(RegistryError::UnsupportedMode {
                command: descriptor.name(),
                mode: self.mode,
            });
        }
        if self.commands.contains_key(&descriptor.name()) {
            return Err(RegistryError::Duplicate {
                command: descriptor.name(),
            });
        }
        self.commands.insert(descriptor.name(), descriptor);
        Ok(())
    }

    /// Look up a registered command.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Unavailable` when the command is not
    /// registered for the bound mode.
    pub fn lookup(&self, command: CommandName) -> Result<&CommandDescriptor, RegistryError> {
        self.commands
            .get(&command)
            .ok_or(RegistryError::Unavailable {
                command,
                mode: self.mode,
            })
    }

    /// Return the mode this registry is bound to.
    #[must_use]
    pub const fn mode(&self) -> EngineMode {
        self.mode
    }
}
