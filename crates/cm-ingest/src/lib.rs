//! Readers for the subsurface input formats.
//!
//! Everything here is pure parsing: readers turn bytes into typed rows
//! and never touch the model. Row-oriented files keep their
//! valid-prefix semantics from the client: rows before the first bad
//! one are returned alongside the error, so a caller can apply them
//! and still report the failure.

pub mod archive;
pub mod error;
pub mod tabular;

pub use archive::{BundleFiles, TopographyImport, read_bundle_zip, read_topography_zip};
pub use error::IngestError;
pub use tabular::{
    GridRow, OrientationRow, PointRow, RowSet, StackRow, SurfaceRow, pole_from_dip_azimuth,
    read_grid_csv, read_orientations_csv, read_points_csv, read_stacks_csv, read_surfaces_csv,
};
