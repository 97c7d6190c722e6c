//! Surface data points.

use crate::actions::Actions;
use crate::id::{EntityId, EntityKind, IdSequences};
use crate::list::{Entity, OrderedList};

/// A single interface data point on a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    id: EntityId,
    idx: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    /// Sequential index used by the engine as the deletion handle.
    pub fn idx(&self) -> u64 {
        self.idx
    }
}

impl Entity for Point {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Ordered list of points belonging to one surface.
///
/// Points are unordered siblings from the user's perspective: moving
/// them is never permitted.
#[derive(Debug, Clone, Default)]
pub struct PointList {
    list: OrderedList<Point>,
}

impl PointList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying ordered list.
    pub fn as_list(&self) -> &OrderedList<Point> {
        &self.list
    }

    pub fn allowed_actions(&self, id: Option<&EntityId>) -> Actions {
        let mut actions = self.list.base_actions(id);
        actions.up = false;
        actions.down = false;
        actions
    }

    pub fn add(&mut self, ids: &mut IdSequences, x: f64, y: f64, z: f64) -> Option<&Point> {
        if !self.allowed_actions(self.list.selected_id()).add {
            return None;
        }
        let point = Point {
            id: ids.next_id(EntityKind::Point),
            idx: ids.next_point_idx(),
            x,
            y,
            z,
        };
        let id = point.id.clone();
        self.list.push(point);
        self.list.get(&id)
    }

    /// Remove a point, returning its engine index.
    pub fn remove(&mut self, id: &EntityId) -> Option<u64> {
        if !self.allowed_actions(Some(id)).remove {
            return None;
        }
        self.list.remove_entry(id).map(|point| point.idx)
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
    fn test_points_are_never_movable() {
        let mut ids = IdSequences::new();
        let mut points = PointList::new();
        let id = points.add(&mut ids, 1.0, 2.0, 3.0).unwrap().id().clone();
        points.add(&mut ids, 4.0, 5.0, 6.0).unwrap();

        let actions = points.allowed_actions(Some(&id));
        assert!(actions.add && actions.remove);
        assert!(!actions.up && !actions.down);
    }

    #[test]
    fn test_remove_returns_engine_idx() {
        let mut ids = IdSequences::new();
        let mut points = PointList::new();
        let first = points.add(&mut ids, 0.0, 0.0, 0.0).unwrap().id().clone();
        let second = points.add(&mut ids, 1.0, 1.0, 1.0).unwrap().id().clone();

        assert_eq!(points.remove(&first), Some(1));
        assert_eq!(points.remove(&second), Some(2));
        assert_eq!(points.remove(&second), None);
    }

    #[test]
    fn test_idx_not_reused_after_removal() {
        let mut ids = IdSequences::new();
        let mut points = PointList::new();
        let first = points.add(&mut ids, 0.0, 0.0, 0.0).unwrap().id().clone();
        points.remove(&first);
        let next = points.add(&mut ids, 2.0, 2.0, 2.0).unwrap();
        assert_eq!(next.idx(), 2);
        assert_eq!(next.id().as_str(), "point_2");
    }
}
