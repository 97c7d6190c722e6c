//! Session error taxonomy.

use cm_ingest::IngestError;
use cm_model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("failed to parse full-model json")]
    Json(#[from] serde_json::Error),

    #[error("snapshot version or type is not supported")]
    IncompatibleSnapshot,

    #[error("do not know how to handle payload `{name}`")]
    UnsupportedPayload { name: String },
}
