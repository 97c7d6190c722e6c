//! Ingest error taxonomy.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read csv")]
    Csv(#[from] csv::Error),

    #[error("missing required column `{column}`")]
    MissingColumn { column: &'static str },

    #[error("line {line}: invalid value `{value}` in column `{column}`")]
    InvalidValue {
        column: &'static str,
        value: String,
        line: u64,
    },

    #[error("no data rows found")]
    Empty,

    #[error("failed to read archive")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to read archive entry")]
    Io(#[from] std::io::Error),

    #[error("archive has more than one top-level directory")]
    AmbiguousArchiveRoot,

    #[error("archive entry `{name}` not found")]
    MissingEntry { name: String },
}
