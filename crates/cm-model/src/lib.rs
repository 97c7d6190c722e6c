//! Domain model for the Conceptual Modeler.
//!
//! The model is a three-level hierarchy of insertion-ordered lists:
//! stacks own surfaces, surfaces own points and orientations. Every
//! mutation is gated by per-entity action flags (`Actions`) so that a
//! UI-triggered request outside the currently valid option set is a
//! silent no-op rather than an error.
//!
//! # Module Organization
//!
//! - [`id`]: Entity identifiers and the per-kind monotonic sequences
//! - [`list`]: The generic ordered list all levels are built from
//! - [`grid`] / [`topography`]: Value objects for the model extent and
//!   the surface topography generation parameters
//! - [`stack`] / [`surface`] / [`point`] / [`orientation`]: The hierarchy
//! - [`model`]: The root owning the whole session state
//! - [`snapshot`]: Versioned export/import types

pub mod actions;
pub mod error;
pub mod feature;
pub mod grid;
pub mod id;
pub mod list;
pub mod model;
pub mod orientation;
pub mod point;
pub mod snapshot;
pub mod stack;
pub mod surface;
pub mod topography;

pub use actions::Actions;
pub use error::ModelError;
pub use feature::Feature;
pub use grid::Grid;
pub use id::{EntityId, EntityKind, IdSequences};
pub use list::{Entity, OrderedList};
pub use model::{
    MoveDirection, OrientationHandle, PointHandle, Removed, StackRef, SubsurfaceModel, SurfaceRef,
};
pub use orientation::{Orientation, OrientationList};
pub use point::{Point, PointList};
pub use snapshot::{
    FullSnapshot, OrientationSnapshot, PointSnapshot, SNAPSHOT_ORIGIN, SNAPSHOT_TYPE,
    SNAPSHOT_VERSION, StackSnapshot, SurfaceSnapshot,
};
pub use stack::{BASEMENT_STACK, BASEMENT_SURFACE, BottomRelation, Stack, Stacks};
pub use surface::{DEFAULT_SURFACE_COLOR, Surface};
pub use topography::{Topography, TopographyCategory, TopographySettings};
