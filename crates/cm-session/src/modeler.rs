//! Session orchestration.

use cm_engine::GeoEngine;
use cm_ingest::{
    BundleFiles, IngestError, TopographyImport, read_bundle_zip, read_grid_csv,
    read_orientations_csv, read_points_csv, read_stacks_csv, read_surfaces_csv,
    read_topography_zip,
};
use cm_model::{
    Entity, EntityId, EntityKind, Feature, FullSnapshot, MoveDirection, OrientationHandle, PointHandle,
    Removed, StackRef, SubsurfaceModel, SurfaceRef, TopographyCategory, TopographySettings,
};
use cm_state::{StateKey, StateSink, sink};
use tracing::{debug, info, warn};

use crate::error::{Result, SessionError};

/// One modeling session: the model, its engine mirror and the client
/// state sink.
pub struct Modeler<E: GeoEngine, S: StateSink> {
    model: SubsurfaceModel,
    engine: E,
    sink: S,
}

impl<E: GeoEngine, S: StateSink> Modeler<E, S> {
    /// Start a session. The engine is initialized with the default grid
    /// and the basement bootstrap, and the full client state is pushed.
    pub fn new(engine: E, sink: S) -> Self {
        let mut session = Self {
            model: SubsurfaceModel::new(),
            engine,
            sink,
        };
        session
            .engine
            .init_data(session.model.grid().extent(), session.model.grid().resolution());
        session.replay_hierarchy();
        session.dirty_all();
        session
    }

    pub fn model(&self) -> &SubsurfaceModel {
        &self.model
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn add_stack(&mut self, name: &str, feature: Feature) -> Option<EntityId> {
        self.add_stack_inner(name, feature, true)
    }

    pub fn add_surface(&mut self, stack: StackRef<'_>, name: &str) -> Option<EntityId> {
        self.add_surface_inner(stack, name, true)
    }

    pub fn add_point(&mut self, surface: SurfaceRef<'_>, x: f64, y: f64, z: f64) -> Option<PointHandle> {
        self.add_point_inner(surface, x, y, z, true)
    }

    pub fn add_orientation(
        &mut self,
        surface: SurfaceRef<'_>,
        x: f64,
        y: f64,
        z: f64,
        pole_vector: [f64; 3],
    ) -> Option<OrientationHandle> {
        self.add_orientation_inner(surface, x, y, z, pole_vector, true)
    }

    /// Remove an entity. A rejected removal still republishes the
    /// affected panes so a stale client converges.
    pub fn remove(&mut self, kind: EntityKind, id: &EntityId) {
        match self.model.remove(kind, id) {
            Some(Removed::Stack { surfaces }) => {
                for surface in &surfaces {
                    self.engine.delete_surface(surface);
                }
                self.reordering();
                let faults = self.model.stacks().fault_ids();
                if !faults.is_empty() {
                    self.engine.set_is_fault(&faults);
                }
                self.dirty_cascade(EntityKind::Stack);
            }
            Some(Removed::Surface(surface)) => {
                self.engine.delete_surface(&surface);
                self.reordering();
                self.refresh_colors();
                self.dirty_cascade(EntityKind::Surface);
            }
            Some(Removed::Point(idx)) => {
                self.engine.delete_surface_point(idx);
                self.dirty_cascade(EntityKind::Point);
            }
            Some(Removed::Orientation(idx)) => {
                self.engine.delete_orientation(idx);
                self.dirty_cascade(EntityKind::Orientation);
            }
            None => {
                debug!(kind = ?kind, %id, "removal rejected");
                self.dirty_cascade(kind);
            }
        }
    }

    /// Toggle a selection and republish the panes below it.
    pub fn select(&mut self, kind: EntityKind, id: &EntityId) {
        self.model.select(kind, id);
        self.dirty_cascade(kind);
    }

    /// Move the selected stack or surface one slot.
    pub fn move_entity(&mut self, kind: EntityKind, direction: MoveDirection) {
        if !self.model.move_selected(kind, direction) {
            return;
        }
        match kind {
            EntityKind::Stack => {
                self.reordering();
                self.dirty_cascade(EntityKind::Stack);
            }
            EntityKind::Surface => {
                self.reordering();
                self.refresh_colors();
                self.dirty_cascade(EntityKind::Surface);
            }
            EntityKind::Point | EntityKind::Orientation => {}
        }
    }

    pub fn update_grid(&mut self, extent: [f64; 6], resolution: [u32; 3]) -> Result<bool> {
        let changed = self.update_grid_inner(extent, resolution, true)?;
        Ok(changed)
    }

    pub fn update_topography(&mut self, settings: &TopographySettings) -> bool {
        self.update_topography_inner(settings, true)
    }

    /// Load a topography raster or saved elevation file. Turns the
    /// topography on under the given category.
    pub fn set_topography_file(&mut self, category: TopographyCategory, bytes: &[u8]) {
        let mut settings = self.model.topography().settings();
        settings.category = category;
        settings.on = true;
        self.model.update_topography(&settings);
        self.engine.set_topography_file(category, bytes);
        self.dirty(&[StateKey::Topography]);
    }

    /// Run the engine interpolation on the current hierarchy.
    pub fn compute(&mut self) {
        info!("computing geomodel");
        self.engine.compute();
    }

    // ------------------------------------------------------------------
    // Import / export
    // ------------------------------------------------------------------

    /// Export the full session as a snapshot.
    pub fn export(&self) -> FullSnapshot {
        self.model.export_state(-1)
    }

    /// Import a named payload, dispatching on the file name.
    ///
    /// Row files keep their valid prefix when parsing aborts partway:
    /// the rows before the failure are applied and the error is
    /// returned afterwards.
    pub fn import_data(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        match name {
            "grid.csv" => {
                let grid = read_grid_csv(bytes)?;
                self.update_grid_inner(grid.extent, grid.resolution, true)?;
                Ok(())
            }
            "stacks.csv" => {
                let set = read_stacks_csv(bytes);
                for row in &set.rows {
                    self.add_stack_inner(&row.name, row.feature, false);
                }
                self.dirty_cascade(EntityKind::Stack);
                set.error.map_or(Ok(()), |error| Err(error.into()))
            }
            "surfaces.csv" => {
                let set = read_surfaces_csv(bytes);
                for row in &set.rows {
                    self.add_surface_inner(StackRef::Name(&row.stack), &row.name, false);
                }
                self.dirty_cascade(EntityKind::Surface);
                set.error.map_or(Ok(()), |error| Err(error.into()))
            }
            "points.csv" => {
                let set = read_points_csv(bytes);
                for row in &set.rows {
                    self.add_point_inner(SurfaceRef::Name(&row.surface), row.x, row.y, row.z, false);
                }
                self.dirty_cascade(EntityKind::Point);
                set.error.map_or(Ok(()), |error| Err(error.into()))
            }
            "orientations.csv" => {
                let set = read_orientations_csv(bytes);
                for row in &set.rows {
                    self.add_orientation_inner(
                        SurfaceRef::Name(&row.surface),
                        row.x,
                        row.y,
                        row.z,
                        row.pole_vector,
                        false,
                    );
                }
                self.dirty_cascade(EntityKind::Orientation);
                set.error.map_or(Ok(()), |error| Err(error.into()))
            }
            "topography.zip" => {
                let imported = read_topography_zip(bytes)?;
                self.apply_topography_import(imported);
                self.dirty(&[StateKey::Topography]);
                Ok(())
            }
            "model.zip" => {
                let bundle = read_bundle_zip(bytes)?;
                self.apply_bundle(bundle)
            }
            "full-model.json" => {
                let snapshot: FullSnapshot = serde_json::from_slice(bytes)?;
                self.import_snapshot(&snapshot)
            }
            other => {
                warn!(payload = other, "unsupported import payload");
                Err(SessionError::UnsupportedPayload {
                    name: other.to_owned(),
                })
            }
        }
    }

    /// Replace the session from a snapshot and resynchronize the engine.
    pub fn import_snapshot(&mut self, snapshot: &FullSnapshot) -> Result<()> {
        if !snapshot.is_compatible() {
            return Err(SessionError::IncompatibleSnapshot);
        }
        self.model.import_state(snapshot);
        self.rebuild_engine();
        self.dirty_all();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn add_stack_inner(&mut self, name: &str, feature: Feature, dirtying: bool) -> Option<EntityId> {
        let id = self.model.add_stack(name, feature)?;
        if dirtying {
            self.dirty_cascade(EntityKind::Stack);
        }
        Some(id)
    }

    fn add_surface_inner(
        &mut self,
        stack: StackRef<'_>,
        name: &str,
        dirtying: bool,
    ) -> Option<EntityId> {
        let id = self.model.add_surface(stack, name)?;
        self.engine.add_surface(&id);
        self.reordering();
        self.refresh_colors();
        if dirtying {
            self.dirty_cascade(EntityKind::Surface);
        }
        Some(id)
    }

    fn add_point_inner(
        &mut self,
        surface: SurfaceRef<'_>,
        x: f64,
        y: f64,
        z: f64,
        dirtying: bool,
    ) -> Option<PointHandle> {
        let handle = self.model.add_point(surface, x, y, z)?;
        self.engine.add_surface_point(&handle);
        if dirtying {
            self.dirty_cascade(EntityKind::Point);
        }
        Some(handle)
    }

    fn add_orientation_inner(
        &mut self,
        surface: SurfaceRef<'_>,
        x: f64,
        y: f64,
        z: f64,
        pole_vector: [f64; 3],
        dirtying: bool,
    ) -> Option<OrientationHandle> {
        let handle = self.model.add_orientation(surface, x, y, z, pole_vector)?;
        self.engine.add_orientation(&handle);
        if dirtying {
            self.dirty_cascade(EntityKind::Orientation);
        }
        Some(handle)
    }

    fn update_grid_inner(
        &mut self,
        extent: [f64; 6],
        resolution: [u32; 3],
        dirtying: bool,
    ) -> Result<bool> {
        let changed = self.model.update_grid(extent, resolution)?;
        if changed {
            self.engine.init_data(extent, resolution);
            if dirtying {
                self.dirty(&[StateKey::Grid, StateKey::Topography]);
            }
        }
        Ok(changed)
    }

    fn update_topography_inner(&mut self, settings: &TopographySettings, dirtying: bool) -> bool {
        if !self.model.update_topography(settings) {
            return false;
        }
        if self.model.topography().category == TopographyCategory::Random {
            self.engine.set_random_topography(self.model.topography());
        }
        if dirtying {
            self.dirty(&[StateKey::Topography]);
        }
        true
    }

    fn apply_topography_import(&mut self, imported: TopographyImport) {
        match imported {
            TopographyImport::Settings(settings) => {
                self.update_topography_inner(&settings, false);
            }
            TopographyImport::File { category, bytes } => {
                let mut settings = self.model.topography().settings();
                settings.category = category;
                settings.on = true;
                self.model.update_topography(&settings);
                self.engine.set_topography_file(category, &bytes);
            }
        }
    }

    fn apply_bundle(&mut self, bundle: BundleFiles) -> Result<()> {
        let mut first_error: Option<IngestError> = None;
        let mut keep = |error: Option<IngestError>| {
            if first_error.is_none() {
                first_error = error;
            }
        };

        if let Some(grid) = bundle.grid {
            self.update_grid_inner(grid.extent, grid.resolution, false)?;
        }
        if let Some(set) = bundle.stacks {
            for row in &set.rows {
                self.add_stack_inner(&row.name, row.feature, false);
            }
            keep(set.error);
        }
        if let Some(set) = bundle.surfaces {
            for row in &set.rows {
                self.add_surface_inner(StackRef::Name(&row.stack), &row.name, false);
            }
            keep(set.error);
        }
        if let Some(set) = bundle.points {
            for row in &set.rows {
                self.add_point_inner(SurfaceRef::Name(&row.surface), row.x, row.y, row.z, false);
            }
            keep(set.error);
        }
        if let Some(set) = bundle.orientations {
            for row in &set.rows {
                self.add_orientation_inner(
                    SurfaceRef::Name(&row.surface),
                    row.x,
                    row.y,
                    row.z,
                    row.pole_vector,
                    false,
                );
            }
            keep(set.error);
        }
        if let Some(imported) = bundle.topography {
            self.apply_topography_import(imported);
        }

        self.dirty_cascade(EntityKind::Stack);
        self.dirty(&[StateKey::Grid, StateKey::Topography]);
        first_error.map_or(Ok(()), |error| Err(error.into()))
    }

    /// Mirror the whole hierarchy into a freshly initialized engine.
    /// Used after a full-model import invalidates the engine state.
    fn rebuild_engine(&mut self) {
        self.engine
            .init_data(self.model.grid().extent(), self.model.grid().resolution());
        self.replay_hierarchy();
        let topography = self.model.topography();
        if topography.on && topography.category == TopographyCategory::Random {
            self.engine.set_random_topography(topography);
        }
    }

    fn replay_hierarchy(&mut self) {
        for stack in self.model.stacks().as_list().iter() {
            for surface in stack.surfaces().iter() {
                self.engine.add_surface(surface.id());
                for point in surface.points.as_list().iter() {
                    self.engine.add_surface_point(&PointHandle {
                        id: point.id().clone(),
                        idx: point.idx(),
                        surface: surface.id().clone(),
                        x: point.x,
                        y: point.y,
                        z: point.z,
                    });
                }
                for orientation in surface.orientations.as_list().iter() {
                    self.engine.add_orientation(&OrientationHandle {
                        id: orientation.id().clone(),
                        idx: orientation.idx(),
                        surface: surface.id().clone(),
                        x: orientation.x,
                        y: orientation.y,
                        z: orientation.z,
                        pole_vector: orientation.pole_vector,
                    });
                }
            }
        }
        self.reordering();
        let faults = self.model.stacks().fault_ids();
        if !faults.is_empty() {
            self.engine.set_is_fault(&faults);
        }
        self.refresh_colors();
    }

    /// Push the derived grouping, order and relations into the engine.
    fn reordering(&mut self) {
        let mapping = self.model.stacks().stack_surface_map();
        self.engine.map_stack_to_surfaces(&mapping);
        let order = self.model.stacks().feature_order();
        if order.len() > 1 {
            self.engine.reorder_features(&order);
        }
        for relation in self.model.stacks().bottom_relations() {
            self.engine.set_bottom_relation(&relation);
        }
    }

    /// Pull the engine's palette back into the surfaces.
    fn refresh_colors(&mut self) {
        for (surface, color) in self.engine.surface_colors() {
            self.model.set_surface_color(&surface, &color);
        }
    }

    fn dirty(&mut self, keys: &[StateKey]) {
        sink::push_keys(&mut self.sink, &self.model, keys);
    }

    fn dirty_cascade(&mut self, kind: EntityKind) {
        sink::push_keys(&mut self.sink, &self.model, StateKey::cascade(kind));
    }

    /// Push every client state key.
    pub fn dirty_all(&mut self) {
        sink::push_all(&mut self.sink, &self.model);
    }
}
