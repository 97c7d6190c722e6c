//! Versioned full-model snapshots.
//!
//! A snapshot carries the complete hierarchy by name and attribute,
//! never by id: ids are session-local and re-derived on import.
//! Selection is annotated per level with a `selected` flag so a
//! restored session opens on the same panes.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::feature::Feature;
use crate::list::Entity;
use crate::model::SubsurfaceModel;
use crate::orientation::Orientation;
use crate::point::Point;
use crate::stack::Stack;
use crate::surface::Surface;
use crate::topography::Topography;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;
/// Discriminator distinguishing full-model files from other payloads.
pub const SNAPSHOT_TYPE: &str = "conceptual-modeler-full";
/// Producer tag written into every snapshot.
pub const SNAPSHOT_ORIGIN: &str = "conceptual-modeler";

fn is_false(value: &bool) -> bool {
    !*value
}

/// A complete, self-contained export of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullSnapshot {
    pub version: u32,
    pub origin: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub grid: Grid,
    #[serde(default)]
    pub stacks: Vec<StackSnapshot>,
    pub topography: Topography,
    /// RFC 3339 timestamp, set by the persistence layer on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSnapshot {
    pub name: String,
    pub feature: Feature,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
    #[serde(default)]
    pub surfaces: Vec<SurfaceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
    #[serde(default)]
    pub points: Vec<PointSnapshot>,
    #[serde(default)]
    pub orientations: Vec<OrientationSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSnapshot {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationSnapshot {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(rename = "poleVector")]
    pub pole_vector: [f64; 3],
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
}

impl FullSnapshot {
    /// Capture the model down to `depth` levels below the stack list.
    /// Negative depth means unlimited; `0` captures no stacks at all.
    pub(crate) fn capture(model: &SubsurfaceModel, depth: i32) -> Self {
        let stacks = if depth == 0 {
            Vec::new()
        } else {
            let list = model.stacks().as_list();
            list.iter()
                .map(|stack| {
                    StackSnapshot::capture(
                        stack,
                        list.selected_id() == Some(stack.id()),
                        depth - 1,
                    )
                })
                .collect()
        };
        Self {
            version: SNAPSHOT_VERSION,
            origin: SNAPSHOT_ORIGIN.to_owned(),
            kind: SNAPSHOT_TYPE.to_owned(),
            grid: model.grid().clone(),
            stacks,
            topography: model.topography().clone(),
            saved_at: None,
        }
    }

    /// Check the version/type header of a deserialized snapshot.
    pub fn is_compatible(&self) -> bool {
        self.version == SNAPSHOT_VERSION && self.kind == SNAPSHOT_TYPE
    }
}

impl StackSnapshot {
    fn capture(stack: &Stack, selected: bool, depth: i32) -> Self {
        let surfaces = if depth == 0 {
            Vec::new()
        } else {
            stack
                .surfaces()
                .iter()
                .map(|surface| {
                    SurfaceSnapshot::capture(
                        surface,
                        stack.surfaces().selected_id() == Some(surface.id()),
                        depth - 1,
                    )
                })
                .collect()
        };
        Self {
            name: stack.name.clone(),
            feature: stack.feature,
            selected,
            surfaces,
        }
    }
}

impl SurfaceSnapshot {
    fn capture(surface: &Surface, selected: bool, depth: i32) -> Self {
        let (points, orientations) = if depth == 0 {
            (Vec::new(), Vec::new())
        } else {
            let points = surface
                .points
                .as_list()
                .iter()
                .map(|point| {
                    PointSnapshot::capture(
                        point,
                        surface.points.as_list().selected_id() == Some(point.id()),
                    )
                })
                .collect();
            let orientations = surface
                .orientations
                .as_list()
                .iter()
                .map(|orientation| {
                    OrientationSnapshot::capture(
                        orientation,
                        surface.orientations.as_list().selected_id() == Some(orientation.id()),
                    )
                })
                .collect();
            (points, orientations)
        };
        Self {
            name: surface.name.clone(),
            selected,
            points,
            orientations,
        }
    }
}

impl PointSnapshot {
    fn capture(point: &Point, selected: bool) -> Self {
        Self {
            x: point.x,
            y: point.y,
            z: point.z,
            selected,
        }
    }
}

impl OrientationSnapshot {
    fn capture(orientation: &Orientation, selected: bool) -> Self {
        Self {
            x: orientation.x,
            y: orientation.y,
            z: orientation.z,
            pole_vector: orientation.pole_vector,
            selected,
        }
    }
}
