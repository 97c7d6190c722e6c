//! Client state projection for the Conceptual Modeler.
//!
//! The UI consumes the model as a flat set of named values: reversed
//! display rows per pane, the active id and permitted actions per
//! level, plus grid and topography blocks. This crate computes that
//! projection ([`ClientState`]), names its slots ([`StateKey`]) and
//! defines the dirty cascade a mutation at one level triggers in the
//! panes below it.

pub mod client_state;
pub mod keys;
pub mod sink;

pub use client_state::{
    ClientState, GridView, OrientationRow, PointRow, StackRow, SurfaceRow, TopographyView,
};
pub use keys::StateKey;
pub use sink::{CollectingSink, NullSink, StateSink};
