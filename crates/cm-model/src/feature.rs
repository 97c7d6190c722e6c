//! Geological feature kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Structural feature of a stack.
///
/// The wire strings are fixed: `Erosion`, `Fault`, `Onlap`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[default]
    Erosion,
    Fault,
    Onlap,
}

impl Feature {
    /// All features, in display order.
    pub const ALL: [Feature; 3] = [Feature::Erosion, Feature::Fault, Feature::Onlap];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Erosion => "Erosion",
            Self::Fault => "Fault",
            Self::Onlap => "Onlap",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Erosion" => Ok(Self::Erosion),
            "Fault" => Ok(Self::Fault),
            "Onlap" => Ok(Self::Onlap),
            other => Err(ModelError::UnknownFeature {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_strings() {
        for feature in Feature::ALL {
            assert_eq!(feature.as_str().parse::<Feature>().unwrap(), feature);
        }
    }

    #[test]
    fn test_rejects_unknown_feature() {
        assert!("Intrusion".parse::<Feature>().is_err());
    }
}
