//! Stratigraphic stacks and the ordered stack list.
//!
//! The stack level carries most of the domain rules: the Basement stack
//! is immutable and pinned to the bottom of the display order, fault
//! stacks cap their surface list at one entry, and reordering must keep
//! a fault stack contiguous with the faults below it.

use serde::Serialize;

use crate::actions::Actions;
use crate::feature::Feature;
use crate::id::{EntityId, EntityKind, IdSequences};
use crate::list::{Entity, OrderedList};
use crate::surface::Surface;

/// Name of the immovable bottom stack every session owns.
pub const BASEMENT_STACK: &str = "Basement";

/// Name of the single surface inside the basement stack.
pub const BASEMENT_SURFACE: &str = "basement";

/// A stratigraphic unit owning an ordered list of surfaces.
#[derive(Debug, Clone)]
pub struct Stack {
    id: EntityId,
    pub name: String,
    pub feature: Feature,
    surfaces: OrderedList<Surface>,
}

impl Entity for Stack {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Stack {
    fn new(id: EntityId, name: impl Into<String>, feature: Feature) -> Self {
        Self {
            id,
            name: name.into(),
            feature,
            surfaces: OrderedList::new(),
        }
    }

    pub fn is_basement(&self) -> bool {
        self.name == BASEMENT_STACK
    }

    pub fn surfaces(&self) -> &OrderedList<Surface> {
        &self.surfaces
    }

    pub fn surface_mut(&mut self, id: &EntityId) -> Option<&mut Surface> {
        self.surfaces.get_mut(id)
    }

    pub fn selected_surface(&self) -> Option<&Surface> {
        self.surfaces.selected()
    }

    pub fn selected_surface_mut(&mut self) -> Option<&mut Surface> {
        self.surfaces.selected_mut()
    }

    pub fn surface_by_name(&self, name: &str) -> Option<&Surface> {
        self.surfaces.iter().find(|surface| surface.name == name)
    }

    /// Permission flags for this stack's surface list.
    ///
    /// A fault can only carry one surface; the basement carries exactly
    /// one immovable, irremovable surface.
    pub fn surface_actions(&self, id: Option<&EntityId>) -> Actions {
        let mut actions = self.surfaces.base_actions(id);
        if self.feature == Feature::Fault {
            actions.add = self.surfaces.is_empty();
        }
        if self.is_basement() {
            actions.add = self.surfaces.is_empty();
            actions.remove = false;
            actions.up = false;
            actions.down = false;
        }
        actions
    }

    /// Add a surface, gated by [`Stack::surface_actions`].
    pub fn add_surface(&mut self, ids: &mut IdSequences, name: &str) -> Option<&Surface> {
        if !self.surface_actions(self.surfaces.selected_id()).add {
            return None;
        }
        let surface = Surface::new(ids.next_id(EntityKind::Surface), name);
        let id = surface.id().clone();
        self.surfaces.push(surface);
        self.surfaces.get(&id)
    }

    /// Remove a surface, returning its id for engine cleanup.
    pub fn remove_surface(&mut self, id: &EntityId) -> Option<EntityId> {
        if !self.surface_actions(Some(id)).remove {
            return None;
        }
        self.surfaces.remove_entry(id).map(|surface| surface.id().clone())
    }

    pub fn move_surface_up(&mut self, id: &EntityId) -> bool {
        self.surface_actions(Some(id)).up && self.surfaces.swap_up(id)
    }

    pub fn move_surface_down(&mut self, id: &EntityId) -> bool {
        self.surface_actions(Some(id)).down && self.surfaces.swap_down(id)
    }

    pub fn toggle_select_surface(&mut self, id: &EntityId) -> bool {
        self.surfaces.toggle_select(id)
    }

    pub(crate) fn set_surface_selection(&mut self, id: Option<EntityId>) {
        self.surfaces.set_selection(id);
    }
}

/// Bottom relation pushed to the engine for one stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottomRelation {
    pub stack: EntityId,
    pub feature: Feature,
}

/// The ordered list of stacks, bottom (oldest) first.
#[derive(Debug, Clone, Default)]
pub struct Stacks {
    list: OrderedList<Stack>,
}

impl Stacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_list(&self) -> &OrderedList<Stack> {
        &self.list
    }

    pub fn get(&self, id: &EntityId) -> Option<&Stack> {
        self.list.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Stack> {
        self.list.get_mut(id)
    }

    pub fn selected_stack(&self) -> Option<&Stack> {
        self.list.selected()
    }

    pub fn selected_stack_mut(&mut self) -> Option<&mut Stack> {
        self.list.selected_mut()
    }

    pub fn toggle_select(&mut self, id: &EntityId) -> bool {
        self.list.toggle_select(id)
    }

    pub(crate) fn set_selection(&mut self, id: Option<EntityId>) {
        self.list.set_selection(id);
    }

    pub fn stack_by_name(&self, name: &str) -> Option<&Stack> {
        self.list.iter().find(|stack| stack.name == name)
    }

    pub fn stack_by_name_mut(&mut self, name: &str) -> Option<&mut Stack> {
        let id = self.stack_by_name(name)?.id().clone();
        self.list.get_mut(&id)
    }

    pub fn surface_by_name(&self, name: &str) -> Option<&Surface> {
        self.list
            .iter()
            .find_map(|stack| stack.surface_by_name(name))
    }

    pub fn surface_by_id(&self, id: &EntityId) -> Option<&Surface> {
        self.list.iter().find_map(|stack| stack.surfaces().get(id))
    }

    /// Stack owning the given surface.
    pub fn stack_of_surface(&self, surface: &EntityId) -> Option<&Stack> {
        self.list
            .iter()
            .find(|stack| stack.surfaces().contains(surface))
    }

    /// Record the engine-assigned color of a surface.
    pub fn set_surface_color(&mut self, surface: &EntityId, color: &str) {
        let owner = self
            .list
            .ids()
            .iter()
            .find(|id| {
                self.list
                    .get(id)
                    .is_some_and(|stack| stack.surfaces().contains(surface))
            })
            .cloned();
        if let Some(owner) = owner
            && let Some(stack) = self.list.get_mut(&owner)
            && let Some(surface) = stack.surface_mut(surface)
        {
            surface.color = color.to_owned();
        }
    }

    // ------------------------------------------------------------------
    // Permission rules
    // ------------------------------------------------------------------

    /// Stack-level permission flags.
    ///
    /// On top of the base rules: the basement (display index 0) cannot be
    /// removed or moved, nothing may move down into its slot, a fault
    /// stack cannot move down past a non-fault stack, and a non-fault
    /// stack cannot move up past a fault stack.
    pub fn allowed_actions(&self, id: Option<&EntityId>) -> Actions {
        let mut actions = self.list.base_actions(id);
        let Some(idx) = id.and_then(|id| self.list.position(id)) else {
            return actions;
        };

        // Basement constraints
        actions.down = idx > 1;
        actions.up = actions.up && idx > 0;
        actions.remove = idx > 0;

        // Fault contiguity constraints
        let order = self.list.ids();
        let feature_at = |i: usize| self.list.get(&order[i]).map(|stack| stack.feature);
        let feature = feature_at(idx);
        if idx > 0 && feature == Some(Feature::Fault) && feature_at(idx - 1) != Some(Feature::Fault)
        {
            actions.down = false;
        }
        if idx + 1 < order.len()
            && feature != Some(Feature::Fault)
            && feature_at(idx + 1) == Some(Feature::Fault)
        {
            actions.up = false;
        }
        actions
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Display position of the first fault stack, if any.
    pub fn first_fault_position(&self) -> Option<usize> {
        self.list
            .iter()
            .position(|stack| stack.feature == Feature::Fault)
    }

    /// Add a stack, applying the fault insertion rule.
    ///
    /// A non-fault stack is inserted immediately below the first fault in
    /// display order (depositional units stay older than pre-existing
    /// faults); fault stacks and fault-free models append at the top.
    pub fn add(&mut self, ids: &mut IdSequences, name: &str, feature: Feature) -> Option<&Stack> {
        if !self.allowed_actions(self.list.selected_id()).add {
            return None;
        }
        let stack = Stack::new(ids.next_id(EntityKind::Stack), name, feature);
        let id = stack.id().clone();
        match self.first_fault_position() {
            Some(position) if feature != Feature::Fault => self.list.insert_at(position, stack),
            _ => self.list.push(stack),
        }
        self.list.get(&id)
    }

    /// Append a stack in snapshot order, bypassing the fault insertion
    /// rule. Used by import, which must reproduce the exported order.
    pub(crate) fn append_for_import(
        &mut self,
        ids: &mut IdSequences,
        name: &str,
        feature: Feature,
    ) -> Option<&mut Stack> {
        if !self.allowed_actions(self.list.selected_id()).add {
            return None;
        }
        let stack = Stack::new(ids.next_id(EntityKind::Stack), name, feature);
        let id = stack.id().clone();
        self.list.push(stack);
        self.list.get_mut(&id)
    }

    /// Remove a stack, returning the ids of its surfaces for engine
    /// cleanup.
    pub fn remove(&mut self, id: &EntityId) -> Option<Vec<EntityId>> {
        if !self.allowed_actions(Some(id)).remove {
            return None;
        }
        let stack = self.list.remove_entry(id)?;
        Some(stack.surfaces().ids().to_vec())
    }

    pub fn move_up(&mut self, id: &EntityId) -> bool {
        self.allowed_actions(Some(id)).up && self.list.swap_up(id)
    }

    pub fn move_down(&mut self, id: &EntityId) -> bool {
        self.allowed_actions(Some(id)).down && self.list.swap_down(id)
    }

    pub(crate) fn clear(&mut self) {
        self.list.clear();
    }

    // ------------------------------------------------------------------
    // Derived engine mappings
    // ------------------------------------------------------------------

    /// Stack-to-surfaces mapping in display order, skipping surfaceless
    /// stacks.
    pub fn stack_surface_map(&self) -> Vec<(EntityId, Vec<EntityId>)> {
        self.list
            .iter()
            .filter(|stack| !stack.surfaces().is_empty())
            .map(|stack| (stack.id().clone(), stack.surfaces().ids().to_vec()))
            .collect()
    }

    /// Feature processing order pushed to the engine: stacks that carry
    /// surfaces, youngest (top of display) first.
    pub fn feature_order(&self) -> Vec<EntityId> {
        let mut order: Vec<EntityId> = self
            .list
            .iter()
            .filter(|stack| !stack.surfaces().is_empty())
            .map(|stack| stack.id().clone())
            .collect();
        order.reverse();
        order
    }

    /// Bottom relation per feature-order entry (last entry excluded): a
    /// fault keeps its own feature, anything else takes the feature of
    /// the next older stack.
    pub fn bottom_relations(&self) -> Vec<BottomRelation> {
        let order = self.feature_order();
        order
            .windows(2)
            .filter_map(|pair| {
                let stack = self.get(&pair[0])?;
                let below = self.get(&pair[1])?;
                let feature = if stack.feature == Feature::Fault {
                    stack.feature
                } else {
                    below.feature
                };
                Some(BottomRelation {
                    stack: stack.id().clone(),
                    feature,
                })
            })
            .collect()
    }

    /// Fault stacks among the feature order, excluding the bottom entry.
    pub fn fault_ids(&self) -> Vec<EntityId> {
        let order = self.feature_order();
        let Some((_, head)) = order.split_last() else {
            return Vec::new();
        };
        head.iter()
            .filter(|id| self.get(id).is_some_and(|stack| stack.feature == Feature::Fault))
            .cloned()
            .collect()
    }

    /// All surface ids, youngest stack first (visualization order).
    pub fn ordered_surfaces(&self) -> Vec<EntityId> {
        let mut surfaces: Vec<EntityId> = self
            .stack_surface_map()
            .into_iter()
            .flat_map(|(_, ids)| ids)
            .collect();
        surfaces.reverse();
        surfaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacks_with_basement(ids: &mut IdSequences) -> Stacks {
        let mut stacks = Stacks::new();
        let basement = stacks
            .add(ids, BASEMENT_STACK, Feature::Erosion)
            .unwrap()
            .id()
            .clone();
        stacks
            .get_mut(&basement)
            .unwrap()
            .add_surface(ids, BASEMENT_SURFACE)
            .unwrap();
        stacks
    }

    fn names(stacks: &Stacks) -> Vec<&str> {
        stacks.as_list().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_basement_is_pinned() {
        let mut ids = IdSequences::new();
        let mut stacks = stacks_with_basement(&mut ids);
        let basement = stacks.as_list().ids()[0].clone();
        stacks.add(&mut ids, "S1", Feature::Erosion);

        let actions = stacks.allowed_actions(Some(&basement));
        assert!(!actions.remove && !actions.up && !actions.down);
        assert!(stacks.remove(&basement).is_none());
        assert!(!stacks.move_up(&basement));
        assert_eq!(stacks.as_list().position(&basement), Some(0));
    }

    #[test]
    fn test_nothing_moves_below_basement() {
        let mut ids = IdSequences::new();
        let mut stacks = stacks_with_basement(&mut ids);
        let s1 = stacks
            .add(&mut ids, "S1", Feature::Erosion)
            .unwrap()
            .id()
            .clone();
        assert!(!stacks.allowed_actions(Some(&s1)).down);
        assert!(!stacks.move_down(&s1));
    }

    #[test]
    fn test_fault_insertion_order_example() {
        let mut ids = IdSequences::new();
        let mut stacks = stacks_with_basement(&mut ids);
        stacks.add(&mut ids, "S1", Feature::Erosion).unwrap();
        stacks.add(&mut ids, "F1", Feature::Fault).unwrap();
        stacks.add(&mut ids, "S2", Feature::Erosion).unwrap();

        // S2 lands immediately below the oldest fault.
        assert_eq!(names(&stacks), [BASEMENT_STACK, "S1", "S2", "F1"]);
    }

    #[test]
    fn test_fault_insertion_uses_display_order() {
        let mut ids = IdSequences::new();
        let mut stacks = stacks_with_basement(&mut ids);
        stacks.add(&mut ids, "F1", Feature::Fault).unwrap();
        let f2 = stacks
            .add(&mut ids, "F2", Feature::Fault)
            .unwrap()
            .id()
            .clone();
        // Swap the faults so that creation order and display order differ.
        assert!(stacks.move_down(&f2));
        assert_eq!(names(&stacks), [BASEMENT_STACK, "F2", "F1"]);

        stacks.add(&mut ids, "S1", Feature::Erosion).unwrap();
        // S1 sits below F2, the first fault the user sees.
        assert_eq!(names(&stacks), [BASEMENT_STACK, "S1", "F2", "F1"]);
    }

    #[test]
    fn test_fault_adjacency_blocks_moves() {
        let mut ids = IdSequences::new();
        let mut stacks = stacks_with_basement(&mut ids);
        let s1 = stacks
            .add(&mut ids, "S1", Feature::Erosion)
            .unwrap()
            .id()
            .clone();
        let f1 = stacks
            .add(&mut ids, "F1", Feature::Fault)
            .unwrap()
            .id()
            .clone();

        // Fault above a non-fault cannot move further down.
        assert!(!stacks.allowed_actions(Some(&f1)).down);
        // Non-fault below a fault cannot move up past it.
        assert!(!stacks.allowed_actions(Some(&s1)).up);
    }

    #[test]
    fn test_fault_surface_cap() {
        let mut ids = IdSequences::new();
        let mut stacks = stacks_with_basement(&mut ids);
        let f1 = stacks
            .add(&mut ids, "F1", Feature::Fault)
            .unwrap()
            .id()
            .clone();
        let fault = stacks.get_mut(&f1).unwrap();
        fault.add_surface(&mut ids, "fault-plane").unwrap();
        assert!(fault.add_surface(&mut ids, "second").is_none());
        assert_eq!(fault.surfaces().len(), 1);
    }

    #[test]
    fn test_basement_surface_is_locked() {
        let mut ids = IdSequences::new();
        let mut stacks = stacks_with_basement(&mut ids);
        let basement_id = stacks.as_list().ids()[0].clone();
        let basement = stacks.get_mut(&basement_id).unwrap();
        let surface = basement.surfaces().ids()[0].clone();

        let actions = basement.surface_actions(Some(&surface));
        assert!(!actions.add && !actions.remove && !actions.up && !actions.down);
        assert!(basement.remove_surface(&surface).is_none());
        assert!(basement.add_surface(&mut ids, "extra").is_none());
    }

    #[test]
    fn test_derived_mappings() {
        let mut ids = IdSequences::new();
        let mut stacks = stacks_with_basement(&mut ids);
        let s1 = stacks
            .add(&mut ids, "S1", Feature::Erosion)
            .unwrap()
            .id()
            .clone();
        let f1 = stacks
            .add(&mut ids, "F1", Feature::Fault)
            .unwrap()
            .id()
            .clone();
        stacks.get_mut(&s1).unwrap().add_surface(&mut ids, "A").unwrap();
        stacks.get_mut(&s1).unwrap().add_surface(&mut ids, "B").unwrap();
        stacks
            .get_mut(&f1)
            .unwrap()
            .add_surface(&mut ids, "fault-plane")
            .unwrap();

        let map = stacks.stack_surface_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map[1].0, s1);
        assert_eq!(map[1].1.len(), 2);

        // Youngest first: F1, S1, Basement.
        let order = stacks.feature_order();
        assert_eq!(order, vec![f1.clone(), s1.clone(), stacks.as_list().ids()[0].clone()]);

        let relations = stacks.bottom_relations();
        assert_eq!(relations.len(), 2);
        // F1 keeps its own feature, S1 takes the basement's.
        assert_eq!(relations[0].feature, Feature::Fault);
        assert_eq!(relations[1].feature, Feature::Erosion);

        assert_eq!(stacks.fault_ids(), vec![f1]);

        let surfaces = stacks.ordered_surfaces();
        assert_eq!(surfaces.len(), 4);
        // Fault plane first (youngest stack), basement surface last.
        assert_eq!(surfaces[0], stacks.get(&stacks.feature_order()[0]).unwrap().surfaces().ids()[0]);
    }

    #[test]
    fn test_surface_lookup_and_color() {
        let mut ids = IdSequences::new();
        let mut stacks = stacks_with_basement(&mut ids);
        let s1 = stacks
            .add(&mut ids, "S1", Feature::Erosion)
            .unwrap()
            .id()
            .clone();
        let surface = stacks
            .get_mut(&s1)
            .unwrap()
            .add_surface(&mut ids, "A")
            .unwrap()
            .id()
            .clone();

        assert!(stacks.surface_by_name("A").is_some());
        assert_eq!(stacks.stack_of_surface(&surface).unwrap().name, "S1");

        stacks.set_surface_color(&surface, "#ff0000");
        assert_eq!(stacks.surface_by_id(&surface).unwrap().color, "#ff0000");
    }
}
