//! Projection of the model into UI-facing values.

use cm_model::{Actions, Entity, EntityId, Feature, Surface, SubsurfaceModel};
use serde::Serialize;

/// One row of the stacks pane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackRow {
    pub id: EntityId,
    pub name: String,
    pub feature: &'static str,
}

/// One row of the surfaces pane. `stackname` and `feature` come from
/// the owning stack so the row is self-describing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceRow {
    pub id: EntityId,
    pub name: String,
    pub color: String,
    pub feature: &'static str,
    pub stackname: String,
}

/// One row of the points pane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointRow {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub surfacename: String,
}

/// One row of the orientations pane, pole vector flattened into the
/// gx/gy/gz columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrientationRow {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub gx: f64,
    pub gy: f64,
    pub gz: f64,
    pub surfacename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridView {
    pub extent: [f64; 6],
    pub resolution: [u32; 3],
}

/// Topography block including the category choices for the dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopographyView {
    pub on: bool,
    pub items: Vec<&'static str>,
    pub category: &'static str,
    pub seed: u64,
    pub fd: f64,
    pub dzmin: f64,
    pub dzmax: f64,
    pub rx: u32,
    pub ry: u32,
}

/// Everything the client binds to, captured in one pass.
///
/// Pane rows are in reversed display order (newest first, basement
/// last). `None` actions mean the pane has no backing list because no
/// parent is selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientState {
    pub features: Vec<&'static str>,
    pub grid: GridView,
    pub stacks: Vec<StackRow>,
    pub active_stack_id: Option<EntityId>,
    pub active_stack_actions: Option<Actions>,
    pub surfaces: Option<Vec<SurfaceRow>>,
    pub active_surface_id: Option<EntityId>,
    pub active_surface_actions: Option<Actions>,
    pub points: Option<Vec<PointRow>>,
    pub active_point_id: Option<EntityId>,
    pub active_point_actions: Option<Actions>,
    pub orientations: Option<Vec<OrientationRow>>,
    pub active_orientation_id: Option<EntityId>,
    pub active_orientation_actions: Option<Actions>,
    pub topography: TopographyView,
}

impl ClientState {
    /// Capture the full projection from the model.
    pub fn capture(model: &SubsurfaceModel) -> Self {
        let stacks = model.stacks();
        let mut stack_rows: Vec<StackRow> = stacks
            .as_list()
            .iter()
            .map(|stack| StackRow {
                id: stack.id().clone(),
                name: stack.name.clone(),
                feature: stack.feature.as_str(),
            })
            .collect();
        stack_rows.reverse();

        let mut state = Self {
            features: Feature::ALL.iter().map(|f| f.as_str()).collect(),
            grid: GridView {
                extent: model.grid().extent(),
                resolution: model.grid().resolution(),
            },
            stacks: stack_rows,
            active_stack_id: None,
            active_stack_actions: None,
            surfaces: None,
            active_surface_id: None,
            active_surface_actions: None,
            points: None,
            active_point_id: None,
            active_point_actions: None,
            orientations: None,
            active_orientation_id: None,
            active_orientation_actions: None,
            topography: TopographyView::capture(model),
        };

        let Some(stack) = stacks.selected_stack() else {
            return state;
        };
        state.active_stack_id = Some(stack.id().clone());
        state.active_stack_actions = Some(stacks.allowed_actions(Some(stack.id())));

        let mut surface_rows: Vec<SurfaceRow> = stack
            .surfaces()
            .iter()
            .map(|surface| SurfaceRow {
                id: surface.id().clone(),
                name: surface.name.clone(),
                color: surface.color.clone(),
                feature: stack.feature.as_str(),
                stackname: stack.name.clone(),
            })
            .collect();
        surface_rows.reverse();
        state.surfaces = Some(surface_rows);
        state.active_surface_id = stack.surfaces().selected_id().cloned();
        state.active_surface_actions =
            Some(stack.surface_actions(stack.surfaces().selected_id()));

        let Some(surface) = stack.selected_surface() else {
            return state;
        };
        state.points = Some(point_rows(surface));
        state.active_point_id = surface.points.as_list().selected_id().cloned();
        state.active_point_actions =
            Some(surface.points.allowed_actions(surface.points.as_list().selected_id()));
        state.orientations = Some(orientation_rows(surface));
        state.active_orientation_id = surface.orientations.as_list().selected_id().cloned();
        state.active_orientation_actions = Some(
            surface
                .orientations
                .allowed_actions(surface.orientations.as_list().selected_id()),
        );
        state
    }
}

impl TopographyView {
    fn capture(model: &SubsurfaceModel) -> Self {
        let topography = model.topography();
        Self {
            on: topography.on,
            items: cm_model::TopographyCategory::ALL
                .iter()
                .map(|category| category.as_str())
                .collect(),
            category: topography.category.as_str(),
            seed: topography.seed,
            fd: topography.fd,
            dzmin: topography.dzmin,
            dzmax: topography.dzmax,
            rx: topography.rx,
            ry: topography.ry,
        }
    }
}

fn point_rows(surface: &Surface) -> Vec<PointRow> {
    let mut rows: Vec<PointRow> = surface
        .points
        .as_list()
        .iter()
        .map(|point| PointRow {
            id: point.id().clone(),
            x: point.x,
            y: point.y,
            z: point.z,
            surfacename: surface.name.clone(),
        })
        .collect();
    rows.reverse();
    rows
}

fn orientation_rows(surface: &Surface) -> Vec<OrientationRow> {
    let mut rows: Vec<OrientationRow> = surface
        .orientations
        .as_list()
        .iter()
        .map(|orientation| OrientationRow {
            id: orientation.id().clone(),
            x: orientation.x,
            y: orientation.y,
            z: orientation.z,
            gx: orientation.pole_vector[0],
            gy: orientation.pole_vector[1],
            gz: orientation.pole_vector[2],
            surfacename: surface.name.clone(),
        })
        .collect();
    rows.reverse();
    rows
}
