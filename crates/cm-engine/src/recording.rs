//! A call-recording engine for tests.

use cm_model::{
    BottomRelation, EntityId, Feature, OrientationHandle, PointHandle, Topography,
    TopographyCategory,
};

use crate::GeoEngine;

/// One recorded engine invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    InitData {
        extent: [f64; 6],
        resolution: [u32; 3],
    },
    AddSurface(EntityId),
    DeleteSurface(EntityId),
    MapStackToSurfaces(Vec<(EntityId, Vec<EntityId>)>),
    ReorderFeatures(Vec<EntityId>),
    SetBottomRelation {
        stack: EntityId,
        feature: Feature,
    },
    SetIsFault(Vec<EntityId>),
    AddSurfacePoint {
        surface: EntityId,
        idx: u64,
    },
    DeleteSurfacePoint(u64),
    AddOrientation {
        surface: EntityId,
        idx: u64,
    },
    DeleteOrientation(u64),
    SetRandomTopography {
        seed: u64,
    },
    SetTopographyFile {
        category: TopographyCategory,
        bytes: usize,
    },
    Compute,
}

/// Engine double that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub calls: Vec<EngineCall>,
    /// Palette handed back by [`GeoEngine::surface_colors`].
    pub colors: Vec<(EntityId, String)>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Recorded calls matching a predicate.
    pub fn filtered(&self, predicate: impl Fn(&EngineCall) -> bool) -> Vec<&EngineCall> {
        self.calls.iter().filter(|call| predicate(call)).collect()
    }
}

impl GeoEngine for RecordingEngine {
    fn init_data(&mut self, extent: [f64; 6], resolution: [u32; 3]) {
        self.calls.push(EngineCall::InitData { extent, resolution });
    }

    fn add_surface(&mut self, surface: &EntityId) {
        self.calls.push(EngineCall::AddSurface(surface.clone()));
    }

    fn delete_surface(&mut self, surface: &EntityId) {
        self.calls.push(EngineCall::DeleteSurface(surface.clone()));
    }

    fn map_stack_to_surfaces(&mut self, mapping: &[(EntityId, Vec<EntityId>)]) {
        self.calls
            .push(EngineCall::MapStackToSurfaces(mapping.to_vec()));
    }

    fn reorder_features(&mut self, features: &[EntityId]) {
        self.calls
            .push(EngineCall::ReorderFeatures(features.to_vec()));
    }

    fn set_bottom_relation(&mut self, relation: &BottomRelation) {
        self.calls.push(EngineCall::SetBottomRelation {
            stack: relation.stack.clone(),
            feature: relation.feature,
        });
    }

    fn set_is_fault(&mut self, faults: &[EntityId]) {
        self.calls.push(EngineCall::SetIsFault(faults.to_vec()));
    }

    fn add_surface_point(&mut self, point: &PointHandle) {
        self.calls.push(EngineCall::AddSurfacePoint {
            surface: point.surface.clone(),
            idx: point.idx,
        });
    }

    fn delete_surface_point(&mut self, idx: u64) {
        self.calls.push(EngineCall::DeleteSurfacePoint(idx));
    }

    fn add_orientation(&mut self, orientation: &OrientationHandle) {
        self.calls.push(EngineCall::AddOrientation {
            surface: orientation.surface.clone(),
            idx: orientation.idx,
        });
    }

    fn delete_orientation(&mut self, idx: u64) {
        self.calls.push(EngineCall::DeleteOrientation(idx));
    }

    fn set_random_topography(&mut self, topography: &Topography) {
        self.calls.push(EngineCall::SetRandomTopography {
            seed: topography.seed,
        });
    }

    fn set_topography_file(&mut self, category: TopographyCategory, bytes: &[u8]) {
        self.calls.push(EngineCall::SetTopographyFile {
            category,
            bytes: bytes.len(),
        });
    }

    fn surface_colors(&self) -> Vec<(EntityId, String)> {
        self.colors.clone()
    }

    fn compute(&mut self) {
        self.calls.push(EngineCall::Compute);
    }
}
