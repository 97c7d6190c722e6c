//! Geological surfaces.

use crate::id::EntityId;
use crate::list::Entity;
use crate::orientation::OrientationList;
use crate::point::PointList;

/// Color assigned to a surface until the engine pushes its palette back.
pub const DEFAULT_SURFACE_COLOR: &str = "#607d8b";

/// A geological interface, owning its data points and orientations.
#[derive(Debug, Clone)]
pub struct Surface {
    id: EntityId,
    pub name: String,
    pub color: String,
    pub points: PointList,
    pub orientations: OrientationList,
}

impl Surface {
    pub(crate) fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: DEFAULT_SURFACE_COLOR.to_owned(),
            points: PointList::new(),
            orientations: OrientationList::new(),
        }
    }
}

impl Entity for Surface {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
