//! Generic insertion-ordered entity list.
//!
//! `OrderedList` keeps a display order (`Vec<EntityId>`) next to the
//! id-keyed storage and tracks at most one selected entry. It provides
//! the ungated primitives; the typed wrappers at each hierarchy level
//! layer their domain rules on top and gate every mutation through
//! [`Actions`] flags.

use std::collections::BTreeMap;

use crate::actions::Actions;
use crate::id::EntityId;

/// Anything stored in an [`OrderedList`].
pub trait Entity {
    fn id(&self) -> &EntityId;
}

/// Insertion-ordered collection of one entity kind.
#[derive(Debug, Clone)]
pub struct OrderedList<T> {
    order: Vec<EntityId>,
    items: BTreeMap<EntityId, T>,
    selected: Option<EntityId>,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            items: BTreeMap::new(),
            selected: None,
        }
    }
}

impl<T: Entity> OrderedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut T> {
        self.items.get_mut(id)
    }

    /// Display position of an id, if present.
    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.order.iter().position(|entry| entry == id)
    }

    /// Ids in display order.
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selected_id(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref().and_then(|id| self.items.get(id))
    }

    pub fn selected_mut(&mut self) -> Option<&mut T> {
        match &self.selected {
            Some(id) => self.items.get_mut(id),
            None => None,
        }
    }

    /// Select `id`, or clear the selection when `id` is already selected.
    ///
    /// Selecting an id that is not in the list is a no-op. Returns true
    /// when the selection changed.
    pub fn toggle_select(&mut self, id: &EntityId) -> bool {
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
            true
        } else if self.items.contains_key(id) {
            self.selected = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub(crate) fn set_selection(&mut self, id: Option<EntityId>) {
        self.selected = id;
    }

    // ------------------------------------------------------------------
    // Base action flags
    // ------------------------------------------------------------------

    /// Base permission flags: add is always allowed; a present entry can
    /// be removed, moved up unless last, moved down unless first.
    pub fn base_actions(&self, id: Option<&EntityId>) -> Actions {
        let mut actions = Actions::add_only();
        if let Some(idx) = id.and_then(|id| self.position(id)) {
            actions.remove = true;
            actions.up = idx + 1 < self.order.len();
            actions.down = idx > 0;
        }
        actions
    }

    // ------------------------------------------------------------------
    // Ungated mutation primitives
    // ------------------------------------------------------------------

    /// Append an entry at the end of the display order.
    pub fn push(&mut self, item: T) {
        let id = item.id().clone();
        self.items.insert(id.clone(), item);
        self.order.push(id);
    }

    /// Insert an entry at a display position (clamped to the end).
    pub fn insert_at(&mut self, index: usize, item: T) {
        let id = item.id().clone();
        self.items.insert(id.clone(), item);
        let index = index.min(self.order.len());
        self.order.insert(index, id);
    }

    /// Remove an entry, clearing the selection if it pointed at it.
    pub fn remove_entry(&mut self, id: &EntityId) -> Option<T> {
        let item = self.items.remove(id)?;
        self.order.retain(|entry| entry != id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Some(item)
    }

    /// Swap with the next-higher display index. True iff a swap occurred.
    pub fn swap_up(&mut self, id: &EntityId) -> bool {
        match self.position(id) {
            Some(idx) if idx + 1 < self.order.len() => {
                self.order.swap(idx, idx + 1);
                true
            }
            _ => false,
        }
    }

    /// Swap with the next-lower display index. True iff a swap occurred.
    pub fn swap_down(&mut self, id: &EntityId) -> bool {
        match self.position(id) {
            Some(idx) if idx > 0 => {
                self.order.swap(idx, idx - 1);
                true
            }
            _ => false,
        }
    }

    /// Drop all entries and the selection.
    pub fn clear(&mut self) {
        self.order.clear();
        self.items.clear();
        self.selected = None;
    }
}
