//! Interface to the geomodeling backend.
//!
//! The session layer mirrors every model mutation into a [`GeoEngine`]
//! so the interpolation backend stays in sync with the hierarchy. The
//! trait is intentionally fire-and-forget: an engine absorbs updates
//! and exposes only the surface color palette back.
//!
//! Two implementations live here: [`NullEngine`] for sessions without
//! a backend, and [`RecordingEngine`] for asserting call sequences in
//! tests.

pub mod recording;

pub use recording::{EngineCall, RecordingEngine};

use cm_model::{
    BottomRelation, EntityId, OrientationHandle, PointHandle, Topography, TopographyCategory,
};

/// Mutation mirror of the model hierarchy.
///
/// Default method bodies are no-ops so an engine only implements the
/// calls it cares about.
pub trait GeoEngine {
    /// (Re)initialize the interpolation grid.
    fn init_data(&mut self, _extent: [f64; 6], _resolution: [u32; 3]) {}

    fn add_surface(&mut self, _surface: &EntityId) {}

    fn delete_surface(&mut self, _surface: &EntityId) {}

    /// Replace the stack-to-surfaces grouping. Stacks without surfaces
    /// are absent from `mapping`.
    fn map_stack_to_surfaces(&mut self, _mapping: &[(EntityId, Vec<EntityId>)]) {}

    /// Reorder the structural features, youngest first.
    fn reorder_features(&mut self, _features: &[EntityId]) {}

    fn set_bottom_relation(&mut self, _relation: &BottomRelation) {}

    /// Flag exactly these stacks as faults.
    fn set_is_fault(&mut self, _faults: &[EntityId]) {}

    fn add_surface_point(&mut self, _point: &PointHandle) {}

    fn delete_surface_point(&mut self, _idx: u64) {}

    fn add_orientation(&mut self, _orientation: &OrientationHandle) {}

    fn delete_orientation(&mut self, _idx: u64) {}

    fn set_random_topography(&mut self, _topography: &Topography) {}

    /// Load a topography raster (`Gdal`) or saved elevation array
    /// (`Saved`) from raw file bytes.
    fn set_topography_file(&mut self, _category: TopographyCategory, _bytes: &[u8]) {}

    /// Color palette assigned by the engine, keyed by surface id.
    fn surface_colors(&self) -> Vec<(EntityId, String)> {
        Vec::new()
    }

    /// Run the interpolation.
    fn compute(&mut self) {}
}

/// Engine that ignores everything. Used when no backend is attached,
/// e.g. for file conversion or inspection.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEngine;

impl GeoEngine for NullEngine {}
