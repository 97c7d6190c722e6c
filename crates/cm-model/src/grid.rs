//! Regular grid extent and resolution.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The regular grid the geomodel is interpolated on.
///
/// `extent` is `[xmin, xmax, ymin, ymax, zmin, zmax]`, `resolution` is
/// `[nx, ny, nz]`. Extent pairs must be ordered and every resolution
/// component must be at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    extent: [f64; 6],
    resolution: [u32; 3],
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            extent: [0.0, 100.0, 0.0, 100.0, 0.0, 100.0],
            resolution: [10, 10, 10],
        }
    }
}

impl Grid {
    pub fn extent(&self) -> [f64; 6] {
        self.extent
    }

    pub fn resolution(&self) -> [u32; 3] {
        self.resolution
    }

    /// Validate a candidate extent/resolution pair.
    pub fn validate(extent: [f64; 6], resolution: [u32; 3]) -> Result<(), ModelError> {
        for (pair, axis) in [(0, 'x'), (2, 'y'), (4, 'z')] {
            if extent[pair] > extent[pair + 1] {
                return Err(ModelError::InvalidExtent {
                    axis,
                    min: extent[pair],
                    max: extent[pair + 1],
                });
            }
        }
        for (component, axis) in resolution.iter().zip(['x', 'y', 'z']) {
            if *component == 0 {
                return Err(ModelError::InvalidResolution { axis });
            }
        }
        Ok(())
    }

    /// Replace extent and resolution.
    ///
    /// Returns `Ok(false)` when the values are identical to the current
    /// ones (callers skip the engine re-init and the dirty push then).
    pub fn update(&mut self, extent: [f64; 6], resolution: [u32; 3]) -> Result<bool, ModelError> {
        Self::validate(extent, resolution)?;
        if self.extent == extent && self.resolution == resolution {
            return Ok(false);
        }
        self.extent = extent;
        self.resolution = resolution;
        Ok(true)
    }
}
