//! The session-wide model root.
//!
//! `SubsurfaceModel` owns the grid, the stack hierarchy, the topography
//! parameters and the id sequences. Mutations go through the gated add
//! paths and return an outcome describing what the engine adapter must
//! replay; a failed precondition returns `None`/`false` and leaves the
//! model untouched.

use tracing::warn;

use crate::error::ModelError;
use crate::feature::Feature;
use crate::grid::Grid;
use crate::id::{EntityId, EntityKind, IdSequences};
use crate::list::Entity;
use crate::snapshot::{FullSnapshot, StackSnapshot};
use crate::stack::{BASEMENT_STACK, BASEMENT_SURFACE, Stacks};
use crate::surface::Surface;
use crate::topography::{Topography, TopographySettings};

/// Addressing a stack by display name or by id.
#[derive(Debug, Clone, Copy)]
pub enum StackRef<'a> {
    Name(&'a str),
    Id(&'a EntityId),
}

/// Addressing a surface by display name or by id.
#[derive(Debug, Clone, Copy)]
pub enum SurfaceRef<'a> {
    Name(&'a str),
    Id(&'a EntityId),
}

/// Direction for a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Engine-relevant description of a newly added point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointHandle {
    pub id: EntityId,
    pub idx: u64,
    pub surface: EntityId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Engine-relevant description of a newly added orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationHandle {
    pub id: EntityId,
    pub idx: u64,
    pub surface: EntityId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pole_vector: [f64; 3],
}

/// What a successful removal left for the engine to delete.
#[derive(Debug, Clone, PartialEq)]
pub enum Removed {
    /// A stack went away together with these surfaces.
    Stack { surfaces: Vec<EntityId> },
    /// A single surface went away.
    Surface(EntityId),
    /// A point went away; the engine handle is its `idx`.
    Point(u64),
    /// An orientation went away; the engine handle is its `idx`.
    Orientation(u64),
}

/// In-memory state of one modeling session.
#[derive(Debug, Clone)]
pub struct SubsurfaceModel {
    grid: Grid,
    stacks: Stacks,
    topography: Topography,
    ids: IdSequences,
}

impl Default for SubsurfaceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SubsurfaceModel {
    /// Create a session with the default grid and the basement bootstrap:
    /// a `Basement` stack holding its single `basement` surface.
    pub fn new() -> Self {
        let mut model = Self {
            grid: Grid::default(),
            stacks: Stacks::new(),
            topography: Topography::default(),
            ids: IdSequences::new(),
        };
        let basement = model
            .stacks
            .add(&mut model.ids, BASEMENT_STACK, Feature::Erosion)
            .map(|stack| stack.id().clone());
        if let Some(basement) = basement {
            model
                .stacks
                .get_mut(&basement)
                .and_then(|stack| stack.add_surface(&mut model.ids, BASEMENT_SURFACE));
        }
        model
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stacks(&self) -> &Stacks {
        &self.stacks
    }

    pub fn topography(&self) -> &Topography {
        &self.topography
    }

    // ------------------------------------------------------------------
    // Grid / topography
    // ------------------------------------------------------------------

    /// Update the grid; re-derives the topography elevation band and
    /// sampling. Returns whether anything changed.
    pub fn update_grid(
        &mut self,
        extent: [f64; 6],
        resolution: [u32; 3],
    ) -> Result<bool, ModelError> {
        let changed = self.grid.update(extent, resolution)?;
        if changed {
            self.topography.rederive_from_grid(&self.grid);
        }
        Ok(changed)
    }

    /// Update the topography parameters. Returns whether anything changed.
    pub fn update_topography(&mut self, settings: &TopographySettings) -> bool {
        self.topography.update(settings)
    }

    // ------------------------------------------------------------------
    // Gated mutation
    // ------------------------------------------------------------------

    /// Add a stack (fault insertion rule applies). Returns its new id.
    pub fn add_stack(&mut self, name: &str, feature: Feature) -> Option<EntityId> {
        self.stacks
            .add(&mut self.ids, name, feature)
            .map(|stack| stack.id().clone())
    }

    /// Add a surface to the addressed stack. Returns the surface id.
    pub fn add_surface(&mut self, stack: StackRef<'_>, name: &str) -> Option<EntityId> {
        let stack_id = self.resolve_stack(stack)?;
        self.stacks
            .get_mut(&stack_id)?
            .add_surface(&mut self.ids, name)
            .map(|surface| surface.id().clone())
    }

    /// Add a data point to the addressed surface.
    pub fn add_point(
        &mut self,
        surface: SurfaceRef<'_>,
        x: f64,
        y: f64,
        z: f64,
    ) -> Option<PointHandle> {
        let surface_id = self.resolve_surface(surface)?;
        let owner = self.stacks.stack_of_surface(&surface_id)?.id().clone();
        let surface = self.stacks.get_mut(&owner)?.surface_mut(&surface_id)?;
        let point = surface.points.add(&mut self.ids, x, y, z)?;
        Some(PointHandle {
            id: point.id().clone(),
            idx: point.idx(),
            surface: surface_id,
            x,
            y,
            z,
        })
    }

    /// Add an orientation to the addressed surface.
    pub fn add_orientation(
        &mut self,
        surface: SurfaceRef<'_>,
        x: f64,
        y: f64,
        z: f64,
        pole_vector: [f64; 3],
    ) -> Option<OrientationHandle> {
        let surface_id = self.resolve_surface(surface)?;
        let owner = self.stacks.stack_of_surface(&surface_id)?.id().clone();
        let surface = self.stacks.get_mut(&owner)?.surface_mut(&surface_id)?;
        let orientation = surface
            .orientations
            .add(&mut self.ids, x, y, z, pole_vector)?;
        Some(OrientationHandle {
            id: orientation.id().clone(),
            idx: orientation.idx(),
            surface: surface_id,
            x,
            y,
            z,
            pole_vector,
        })
    }

    /// Remove an entity addressed by kind and id.
    ///
    /// Surfaces are removed from the selected stack, points and
    /// orientations from the selected surface of the selected stack
    /// (matching the client, which only shows those lists).
    pub fn remove(&mut self, kind: EntityKind, id: &EntityId) -> Option<Removed> {
        match kind {
            EntityKind::Stack => self
                .stacks
                .remove(id)
                .map(|surfaces| Removed::Stack { surfaces }),
            EntityKind::Surface => {
                let stack = self.stacks.selected_stack()?.id().clone();
                self.stacks
                    .get_mut(&stack)?
                    .remove_surface(id)
                    .map(Removed::Surface)
            }
            EntityKind::Point => self
                .selected_surface_mut()?
                .points
                .remove(id)
                .map(Removed::Point),
            EntityKind::Orientation => self
                .selected_surface_mut()?
                .orientations
                .remove(id)
                .map(Removed::Orientation),
        }
    }

    /// Toggle the selection at one level. Returns whether it changed.
    pub fn select(&mut self, kind: EntityKind, id: &EntityId) -> bool {
        match kind {
            EntityKind::Stack => self.stacks.toggle_select(id),
            EntityKind::Surface => match self.stacks.selected_stack_mut() {
                Some(stack) => stack.toggle_select_surface(id),
                None => false,
            },
            EntityKind::Point => match self.selected_surface_mut() {
                Some(surface) => surface.points.toggle_select(id),
                None => false,
            },
            EntityKind::Orientation => match self.selected_surface_mut() {
                Some(surface) => surface.orientations.toggle_select(id),
                None => false,
            },
        }
    }

    /// Move the current selection of a level. Only stacks and surfaces
    /// are reorderable. Returns true iff a swap occurred.
    pub fn move_selected(&mut self, kind: EntityKind, direction: MoveDirection) -> bool {
        match kind {
            EntityKind::Stack => {
                let Some(id) = self.stacks.as_list().selected_id().cloned() else {
                    return false;
                };
                match direction {
                    MoveDirection::Up => self.stacks.move_up(&id),
                    MoveDirection::Down => self.stacks.move_down(&id),
                }
            }
            EntityKind::Surface => {
                let Some(stack) = self.stacks.selected_stack() else {
                    return false;
                };
                let stack_id = stack.id().clone();
                let Some(surface) = stack.surfaces().selected_id().cloned() else {
                    return false;
                };
                let Some(stack) = self.stacks.get_mut(&stack_id) else {
                    return false;
                };
                match direction {
                    MoveDirection::Up => stack.move_surface_up(&surface),
                    MoveDirection::Down => stack.move_surface_down(&surface),
                }
            }
            EntityKind::Point | EntityKind::Orientation => false,
        }
    }

    /// Overwrite a surface color, typically with the engine palette.
    pub fn set_surface_color(&mut self, surface: &EntityId, color: &str) {
        self.stacks.set_surface_color(surface, color);
    }

    /// Surface currently shown in the point/orientation panes.
    pub fn selected_surface(&self) -> Option<&Surface> {
        self.stacks.selected_stack()?.selected_surface()
    }

    fn selected_surface_mut(&mut self) -> Option<&mut Surface> {
        self.stacks.selected_stack_mut()?.selected_surface_mut()
    }

    fn resolve_stack(&self, stack: StackRef<'_>) -> Option<EntityId> {
        match stack {
            StackRef::Name(name) => self.stacks.stack_by_name(name).map(|s| s.id().clone()),
            StackRef::Id(id) => self.stacks.get(id).map(|s| s.id().clone()),
        }
    }

    fn resolve_surface(&self, surface: SurfaceRef<'_>) -> Option<EntityId> {
        match surface {
            SurfaceRef::Name(name) => self.stacks.surface_by_name(name).map(|s| s.id().clone()),
            SurfaceRef::Id(id) => self.stacks.surface_by_id(id).map(|s| s.id().clone()),
        }
    }

    // ------------------------------------------------------------------
    // Export / import
    // ------------------------------------------------------------------

    /// Export the full hierarchy as a versioned snapshot.
    ///
    /// `depth` limits recursion: negative means unlimited, `0` stops
    /// before the next list level.
    pub fn export_state(&self, depth: i32) -> FullSnapshot {
        FullSnapshot::capture(self, depth)
    }

    /// Replace the whole hierarchy from a snapshot.
    ///
    /// Ids are re-derived through the normal add paths, so they may
    /// differ from the snapshot's; names, attributes, order and the
    /// `selected` annotations are preserved. The basement stack is
    /// imported first whatever its snapshot position, and a snapshot
    /// without one gets it re-created, so the bottom slot always holds
    /// the basement afterwards.
    pub fn import_state(&mut self, snapshot: &FullSnapshot) {
        if let Err(error) = self
            .grid
            .update(snapshot.grid.extent(), snapshot.grid.resolution())
        {
            warn!(%error, "ignoring invalid grid in snapshot");
        }
        self.topography = snapshot.topography.clone();

        self.stacks.clear();
        match snapshot
            .stacks
            .iter()
            .find(|stack| stack.name == BASEMENT_STACK)
        {
            Some(stack) => self.import_stack(stack),
            None => {
                warn!("snapshot has no basement stack, recreating it");
                let basement = self
                    .stacks
                    .append_for_import(&mut self.ids, BASEMENT_STACK, Feature::Erosion)
                    .map(|stack| stack.id().clone());
                if let Some(basement) = basement {
                    self.stacks
                        .get_mut(&basement)
                        .and_then(|stack| stack.add_surface(&mut self.ids, BASEMENT_SURFACE));
                }
            }
        }
        for stack in snapshot
            .stacks
            .iter()
            .filter(|stack| stack.name != BASEMENT_STACK)
        {
            self.import_stack(stack);
        }
    }

    fn import_stack(&mut self, snapshot: &StackSnapshot) {
        let Some(stack_id) = self
            .stacks
            .append_for_import(&mut self.ids, &snapshot.name, snapshot.feature)
            .map(|stack| stack.id().clone())
        else {
            return;
        };
        for surface in &snapshot.surfaces {
            let Some(surface_id) =
                self.add_surface(StackRef::Id(&stack_id), &surface.name)
            else {
                warn!(surface = %surface.name, "snapshot surface rejected, skipping");
                continue;
            };
            for point in &surface.points {
                self.add_point(SurfaceRef::Id(&surface_id), point.x, point.y, point.z);
            }
            for orientation in &surface.orientations {
                self.add_orientation(
                    SurfaceRef::Id(&surface_id),
                    orientation.x,
                    orientation.y,
                    orientation.z,
                    orientation.pole_vector,
                );
            }
            // Restore nested selections from the annotations.
            let selected_point = surface
                .points
                .iter()
                .position(|p| p.selected)
                .and_then(|i| self.nth_point_id(&stack_id, &surface_id, i));
            let selected_orientation = surface
                .orientations
                .iter()
                .position(|o| o.selected)
                .and_then(|i| self.nth_orientation_id(&stack_id, &surface_id, i));
            if let Some(stack) = self.stacks.get_mut(&stack_id)
                && let Some(target) = stack.surface_mut(&surface_id)
            {
                target.points.set_selection(selected_point);
                target.orientations.set_selection(selected_orientation);
            }
            if surface.selected
                && let Some(stack) = self.stacks.get_mut(&stack_id)
            {
                stack.set_surface_selection(Some(surface_id));
            }
        }
        if snapshot.selected {
            self.stacks.set_selection(Some(stack_id));
        }
    }

    fn nth_point_id(
        &self,
        stack: &EntityId,
        surface: &EntityId,
        index: usize,
    ) -> Option<EntityId> {
        let surface = self.stacks.get(stack)?.surfaces().get(surface)?;
        surface.points.as_list().ids().get(index).cloned()
    }

    fn nth_orientation_id(
        &self,
        stack: &EntityId,
        surface: &EntityId,
        index: usize,
    ) -> Option<EntityId> {
        let surface = self.stacks.get(stack)?.surfaces().get(surface)?;
        surface.orientations.as_list().ids().get(index).cloned()
    }
}
