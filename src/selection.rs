//! Container selection.
//!
//! Turns positional identifiers and the `--all`/`--latest` modifiers into a
//! validated [`Selection`], then resolves it against a snapshot of the
//! containers an engine knows about. Validation never touches an engine;
//! explicit identifiers are passed through unchecked so the authoritative
//! backend can report unknown names per target.

use crate::error::SelectionError;

/// Boolean selection modifiers supplied alongside positional identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Select every container known to the engine.
    pub all: bool,
    /// Select the most recently created container.
    pub latest: bool,
}

/// A container as seen by an engine listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    /// Full container ID.
    pub id: String,
    /// Creation time as seconds since the Unix epoch.
    pub created: i64,
}

impl ContainerSummary {
    /// Create a summary.
    #[must_use]
    pub fn new(id: impl Into<String>, created: i64) -> Self {
        Self {
            id: id.into(),
            created,
        }
    }
}

/// A validated selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Containers named explicitly by ID or name, in the order given.
    Explicit(Vec<String>),
    /// Every container known at resolution time.
    All,
    /// The most recently created container.
    Latest,
}

impl Selection {
    /// Validate raw identifiers and modifiers.
    ///
    /// Exactly one of explicit identifiers, `all`, or `latest` must be
    /// active.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::Conflict` when more than one mode is active
    /// and `SelectionError::Empty` when none is.
    pub fn from_args(ids: Vec<String>, options: SelectionOptions) -> Result<Self, SelectionError> {
        let explicit = !ids.is_empty();
        match (explicit, options.all, options.latest) {
            (true, true, _) => Err(SelectionError::Conflict {
                first: "--all",
                second: "container names or IDs",
            }),
            (true, _, true) => Err(SelectionError::Conflict {
                first: "--latest",
                second: "container names or IDs",
            }),
            (false, true, true) => Err(SelectionError::Conflict {
                first: "--all",
                second: "--latest",
            }),
            (true, false, false) => Ok(Self::Explicit(ids)),
            (false, true, false) => Ok(Self::All),
            (false, false, true) => Ok(Self::Latest),
            (false, false, false) => Err(SelectionError::Empty),
        }
    }

    /// Return whether resolution needs a container listing.
    #[must_use]
    pub const fn needs_snapshot(&self) -> bool {
        !matches!(self, Self::Explicit(_))
    }

    /// Return the modifiers equivalent to this selection.
    #[must_use]
    pub const fn options(&self) -> SelectionOptions {
        SelectionOptions {
            all: matches!(self, Self::All),
            latest: matches!(self, Self::Latest),
        }
    }

    /// Return the explicit identifiers, or an empty slice for modifier-based
    /// selections.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        match self {
            Self::Explicit(ids) => ids,
            Self::All | Self::Latest => &[],
        }
    }

    /// Resolve the selection against a snapshot of known containers.
    ///
    /// `All` yields IDs in snapshot order. `Latest` yields the container
    /// with the greatest creation time; on a tie the later snapshot entry
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NoContainers` when `Latest` is resolved
    /// against an empty snapshot.
    pub fn resolve(&self, snapshot: &[ContainerSummary]) -> Result<Vec<String>, SelectionError> {
        match self {
            Self::Explicit(ids) => Ok(ids.clone()),
            Self::All => Ok(snapshot.iter().map(|c| c.id.clone()).collect()),
            Self::Latest => snapshot
                .iter()
                .max_by_key(|c| c.created)
                .map(|c| vec![c.id.clone()])
                .ok_or(SelectionError::NoContainers),
        }
    }
}
