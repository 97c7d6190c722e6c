//! Names of the client state slots and the dirty cascade.

use std::fmt;
use std::str::FromStr;

use cm_model::EntityKind;

/// One slot of the published client state.
///
/// The wire names are camelCase because that is what the UI binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Features,
    Grid,
    Stacks,
    ActiveStackId,
    ActiveStackActions,
    Surfaces,
    ActiveSurfaceId,
    ActiveSurfaceActions,
    Points,
    ActivePointId,
    ActivePointActions,
    Orientations,
    ActiveOrientationId,
    ActiveOrientationActions,
    Topography,
}

impl StateKey {
    pub const ALL: [StateKey; 15] = [
        StateKey::Features,
        StateKey::Grid,
        StateKey::Stacks,
        StateKey::ActiveStackId,
        StateKey::ActiveStackActions,
        StateKey::Surfaces,
        StateKey::ActiveSurfaceId,
        StateKey::ActiveSurfaceActions,
        StateKey::Points,
        StateKey::ActivePointId,
        StateKey::ActivePointActions,
        StateKey::Orientations,
        StateKey::ActiveOrientationId,
        StateKey::ActiveOrientationActions,
        StateKey::Topography,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Features => "features",
            Self::Grid => "grid",
            Self::Stacks => "stacks",
            Self::ActiveStackId => "activeStackId",
            Self::ActiveStackActions => "activeStackActions",
            Self::Surfaces => "surfaces",
            Self::ActiveSurfaceId => "activeSurfaceId",
            Self::ActiveSurfaceActions => "activeSurfaceActions",
            Self::Points => "points",
            Self::ActivePointId => "activePointId",
            Self::ActivePointActions => "activePointActions",
            Self::Orientations => "orientations",
            Self::ActiveOrientationId => "activeOrientationId",
            Self::ActiveOrientationActions => "activeOrientationActions",
            Self::Topography => "topography",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// Keys to republish after a mutation at `kind` level.
    ///
    /// A change cascades downward: the panes below the mutated level
    /// show children of a possibly different parent afterwards, so
    /// their rows, active id and actions are all stale.
    pub fn cascade(kind: EntityKind) -> &'static [StateKey] {
        const STACK: &[StateKey] = &[
            StateKey::Stacks,
            StateKey::ActiveStackId,
            StateKey::ActiveStackActions,
            StateKey::Surfaces,
            StateKey::ActiveSurfaceId,
            StateKey::ActiveSurfaceActions,
            StateKey::Points,
            StateKey::ActivePointId,
            StateKey::ActivePointActions,
            StateKey::Orientations,
            StateKey::ActiveOrientationId,
            StateKey::ActiveOrientationActions,
        ];
        const SURFACE: &[StateKey] = &[
            StateKey::Surfaces,
            StateKey::ActiveSurfaceId,
            StateKey::ActiveSurfaceActions,
            StateKey::Points,
            StateKey::ActivePointId,
            StateKey::ActivePointActions,
            StateKey::Orientations,
            StateKey::ActiveOrientationId,
            StateKey::ActiveOrientationActions,
        ];
        const POINT: &[StateKey] = &[
            StateKey::Points,
            StateKey::ActivePointId,
            StateKey::ActivePointActions,
        ];
        const ORIENTATION: &[StateKey] = &[
            StateKey::Orientations,
            StateKey::ActiveOrientationId,
            StateKey::ActiveOrientationActions,
        ];
        match kind {
            EntityKind::Stack => STACK,
            EntityKind::Surface => SURFACE,
            EntityKind::Point => POINT,
            EntityKind::Orientation => ORIENTATION,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(())
    }
}
