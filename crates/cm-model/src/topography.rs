//! Topography generation parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::grid::Grid;

/// How the surface topography is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopographyCategory {
    /// Fractal-noise terrain seeded by [`Topography::seed`].
    #[default]
    Random,
    /// Raster file interpreted by the engine's GDAL reader.
    Gdal,
    /// Previously saved elevation array.
    Saved,
}

impl TopographyCategory {
    pub const ALL: [TopographyCategory; 3] = [
        TopographyCategory::Random,
        TopographyCategory::Gdal,
        TopographyCategory::Saved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Gdal => "gdal",
            Self::Saved => "saved",
        }
    }
}

impl fmt::Display for TopographyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopographyCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "gdal" => Ok(Self::Gdal),
            "saved" => Ok(Self::Saved),
            other => Err(ModelError::UnknownCategory {
                value: other.to_owned(),
            }),
        }
    }
}

/// Update payload for [`Topography::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopographySettings {
    pub on: bool,
    pub category: TopographyCategory,
    pub seed: u64,
    /// Fractal dimension of the random terrain.
    pub fd: f64,
    pub dzmin: f64,
    pub dzmax: f64,
    pub rx: u32,
    pub ry: u32,
}

/// Topography state of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topography {
    pub on: bool,
    pub category: TopographyCategory,
    pub seed: u64,
    pub fd: f64,
    pub dzmin: f64,
    pub dzmax: f64,
    pub rx: u32,
    pub ry: u32,
}

impl Default for Topography {
    fn default() -> Self {
        Self {
            on: false,
            category: TopographyCategory::Random,
            seed: 1515,
            fd: 2.0,
            dzmin: 80.0,
            dzmax: 100.0,
            rx: 10,
            ry: 10,
        }
    }
}

impl Topography {
    /// Apply new settings. Returns true when anything changed.
    pub fn update(&mut self, settings: &TopographySettings) -> bool {
        let next = Self {
            on: settings.on,
            category: settings.category,
            seed: settings.seed,
            fd: settings.fd,
            dzmin: settings.dzmin,
            dzmax: settings.dzmax,
            rx: settings.rx,
            ry: settings.ry,
        };
        if *self == next {
            return false;
        }
        *self = next;
        true
    }

    /// Current values as an update payload.
    pub fn settings(&self) -> TopographySettings {
        TopographySettings {
            on: self.on,
            category: self.category,
            seed: self.seed,
            fd: self.fd,
            dzmin: self.dzmin,
            dzmax: self.dzmax,
            rx: self.rx,
            ry: self.ry,
        }
    }

    /// Re-derive the elevation band and sampling from a new grid: the band
    /// covers the top 20% of the z extent, sampling follows nx/ny.
    pub fn rederive_from_grid(&mut self, grid: &Grid) {
        let extent = grid.extent();
        let resolution = grid.resolution();
        self.dzmin = extent[5] - 0.2 * (extent[5] - extent[4]);
        self.dzmax = extent[5];
        self.rx = resolution[0];
        self.ry = resolution[1];
    }
}
