//! Per-entity action permission flags.

use serde::{Deserialize, Serialize};

/// Which mutations are currently permitted for a list entry.
///
/// Computed from the current order and the entity's position; level
/// rules (basement immutability, fault caps) adjust the base flags.
/// `up` means "swap with the next-higher display index" and `down`
/// "swap with the next-lower one"; the naming is a fixed contract with
/// the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actions {
    pub add: bool,
    pub remove: bool,
    pub up: bool,
    pub down: bool,
}

impl Actions {
    /// Flags when no entity is addressed: adding is allowed, nothing else.
    pub fn add_only() -> Self {
        Self {
            add: true,
            ..Self::default()
        }
    }

    /// No action permitted.
    pub fn none() -> Self {
        Self::default()
    }
}
