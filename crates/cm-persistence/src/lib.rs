//! Snapshot files on disk.
//!
//! Saves go through a temp file in the target directory followed by an
//! atomic rename, so a crash mid-write never leaves a truncated
//! snapshot behind. Loads check the version/type header before
//! anything touches a model.

use std::path::Path;

use chrono::Utc;
use cm_model::FullSnapshot;
use thiserror::Error;
use tracing::{debug, info};

pub type Result<T> = std::result::Result<T, PersistenceError>;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access snapshot file")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid json")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot: version {version}, type `{kind}`")]
    Incompatible { version: u32, kind: String },
}

/// Write a snapshot to `path`, stamping `saved_at` with the current
/// time.
pub fn save_snapshot(path: &Path, snapshot: &FullSnapshot) -> Result<()> {
    let mut stamped = snapshot.clone();
    stamped.saved_at = Some(Utc::now().to_rfc3339());
    let bytes = serde_json::to_vec_pretty(&stamped)?;

    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let temp = tempfile::NamedTempFile::new_in(directory)?;
    std::fs::write(temp.path(), &bytes)?;
    temp.persist(path).map_err(|error| error.error)?;

    info!(path = %path.display(), bytes = bytes.len(), "snapshot saved");
    Ok(())
}

/// Read and validate a snapshot from `path`.
pub fn load_snapshot(path: &Path) -> Result<FullSnapshot> {
    let bytes = std::fs::read(path)?;
    let snapshot: FullSnapshot = serde_json::from_slice(&bytes)?;
    if !snapshot.is_compatible() {
        return Err(PersistenceError::Incompatible {
            version: snapshot.version,
            kind: snapshot.kind,
        });
    }
    debug!(path = %path.display(), stacks = snapshot.stacks.len(), "snapshot loaded");
    Ok(snapshot)
}
