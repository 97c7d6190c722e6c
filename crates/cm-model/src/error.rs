//! Error types for the domain model.

use thiserror::Error;

/// Errors raised by model value validation.
///
/// Precondition failures on list mutations are *not* errors: those are
/// silent no-ops signalled through return values. `ModelError` covers
/// malformed values that can never enter the model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An extent pair is not ordered min <= max.
    #[error("extent pair {axis} is not ordered: {min} > {max}")]
    InvalidExtent { axis: char, min: f64, max: f64 },

    /// A resolution component is zero.
    #[error("resolution component {axis} must be at least 1")]
    InvalidResolution { axis: char },

    /// A feature string does not name a known geological feature.
    #[error("unknown feature '{value}' (expected Erosion, Fault or Onlap)")]
    UnknownFeature { value: String },

    /// A topography category string is not one of random/gdal/saved.
    #[error("unknown topography category '{value}'")]
    UnknownCategory { value: String },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::InvalidExtent {
            axis: 'x',
            min: 10.0,
            max: 0.0,
        };
        assert_eq!(err.to_string(), "extent pair x is not ordered: 10 > 0");
    }
}
