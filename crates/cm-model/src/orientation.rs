//! Surface orientation measurements.

use crate::actions::Actions;
use crate::id::{EntityId, EntityKind, IdSequences};
use crate::list::{Entity, OrderedList};

/// An orientation measurement: a location plus the interface pole vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    id: EntityId,
    idx: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Gradient of the scalar field at the location: `[gx, gy, gz]`.
    pub pole_vector: [f64; 3],
}

impl Orientation {
    /// Sequential index used by the engine as the deletion handle.
    pub fn idx(&self) -> u64 {
        self.idx
    }
}

impl Entity for Orientation {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Ordered list of orientations belonging to one surface.
///
/// Like points, orientations cannot be reordered.
#[derive(Debug, Clone, Default)]
pub struct OrientationList {
    list: OrderedList<Orientation>,
}

impl OrientationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_list(&self) -> &OrderedList<Orientation> {
        &self.list
    }

    pub fn allowed_actions(&self, id: Option<&EntityId>) -> Actions {
        let mut actions = self.list.base_actions(id);
        actions.up = false;
        actions.down = false;
        actions
    }

    pub fn add(
        &mut self,
        ids: &mut IdSequences,
        x: f64,
        y: f64,
        z: f64,
        pole_vector: [f64; 3],
    ) -> Option<&Orientation> {
        if !self.allowed_actions(self.list.selected_id()).add {
            return None;
        }
        let orientation = Orientation {
            id: ids.next_id(EntityKind::Orientation),
            idx: ids.next_orientation_idx(),
            x,
            y,
            z,
            pole_vector,
        };
        let id = orientation.id.clone();
        self.list.push(orientation);
        self.list.get(&id)
    }

    /// Remove an orientation, returning its engine index.
    pub fn remove(&mut self, id: &EntityId) -> Option<u64> {
        if !self.allowed_actions(Some(id)).remove {
            return None;
        }
        self.list.remove_entry(id).map(|orientation| orientation.idx)
    }

    pub fn toggle_select(&mut self, id: &EntityId) -> bool {
        self.list.toggle_select(id)
    }

    pub(crate) fn set_selection(&mut self, id: Option<EntityId>) {
        self.list.set_selection(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientations_are_never_movable() {
        let mut ids = IdSequences::new();
        let mut orientations = OrientationList::new();
        let id = orientations
            .add(&mut ids, 1.0, 2.0, 3.0, [0.0, 0.0, 1.0])
            .unwrap()
            .id()
            .clone();

        let actions = orientations.allowed_actions(Some(&id));
        assert!(actions.remove);
        assert!(!actions.up && !actions.down);
    }

    #[test]
    fn test_remove_returns_engine_idx() {
        let mut ids = IdSequences::new();
        let mut orientations = OrientationList::new();
        let id = orientations
            .add(&mut ids, 0.0, 0.0, 0.0, [0.0, 0.0, 1.0])
            .unwrap()
            .id()
            .clone();
        assert_eq!(orientations.remove(&id), Some(1));
    }
}
