//! Entity identifiers and id generation.
//!
//! Every entity gets a `"<prefix>_<n>"` id from a per-kind monotonic
//! counter. Counters are owned by the model root and threaded through
//! the add paths, so ids are unique for the lifetime of a session and
//! are never reused after a removal or an import.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a model entity.
///
/// Generated ids look like `stack_1` or `surface_4`. Imported snapshots
/// carry the ids they were exported with, but import re-derives fresh
/// ids, so an `EntityId` is only meaningful within one session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The four kinds of list-managed entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Stack,
    Surface,
    Point,
    Orientation,
}

impl EntityKind {
    /// Prefix used for generated ids of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Stack => "stack",
            Self::Surface => "surface",
            Self::Point => "point",
            Self::Orientation => "orientation",
        }
    }
}

/// Per-kind monotonic id counters.
///
/// Points and orientations additionally carry a sequential `idx` used
/// as the deletion handle by the external engine; those sequences live
/// here as well and follow the same never-reused rule.
#[derive(Debug, Default, Clone)]
pub struct IdSequences {
    stack: u64,
    surface: u64,
    point: u64,
    orientation: u64,
    point_idx: u64,
    orientation_idx: u64,
}

impl IdSequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next id for the given kind.
    pub fn next_id(&mut self, kind: EntityKind) -> EntityId {
        let counter = match kind {
            EntityKind::Stack => &mut self.stack,
            EntityKind::Surface => &mut self.surface,
            EntityKind::Point => &mut self.point,
            EntityKind::Orientation => &mut self.orientation,
        };
        *counter += 1;
        EntityId::new(format!("{}_{}", kind.prefix(), counter))
    }

    /// Next sequential point index.
    pub fn next_point_idx(&mut self) -> u64 {
        self.point_idx += 1;
        self.point_idx
    }

    /// Next sequential orientation index.
    pub fn next_orientation_idx(&mut self) -> u64 {
        self.orientation_idx += 1;
        self.orientation_idx
    }
}
