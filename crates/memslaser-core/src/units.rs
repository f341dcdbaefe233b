//! Length unit utilities
//!
//! Lengths cross crate boundaries as plain `f64` values tagged with a unit
//! expressed as a scaling factor with respect to meters (e.g. `1e-6` for
//! micrometers). [`LengthUnit`] names the units recognized in configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Millimeters
    #[serde(rename = "mm")]
    Millimeter,
    /// Micrometers
    #[serde(rename = "um")]
    Micrometer,
    /// Nanometers
    #[serde(rename = "nm")]
    Nanometer,
}

impl LengthUnit {
    /// Scaling factor with respect to meters
    pub const fn meters(&self) -> f64 {
        match self {
            Self::Millimeter => 1e-3,
            Self::Micrometer => 1e-6,
            Self::Nanometer => 1e-9,
        }
    }

    /// Short label ("mm", "um" or "nm")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Micrometer => "um",
            Self::Nanometer => "nm",
        }
    }

    /// All recognized units
    pub fn all() -> [LengthUnit; 3] {
        [Self::Millimeter, Self::Micrometer, Self::Nanometer]
    }
}

impl Default for LengthUnit {
    fn default() -> Self {
        Self::Micrometer
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for LengthUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" => Ok(Self::Millimeter),
            "um" | "µm" => Ok(Self::Micrometer),
            "nm" => Ok(Self::Nanometer),
            _ => Err(ConfigError::UnknownUnit(s.to_string())),
        }
    }
}

/// Factor converting a value in `from_meters` units to `to_meters` units
///
/// * `from_meters` - Source unit as meters per unit
/// * `to_meters` - Target unit as meters per unit
pub fn unit_conversion_factor(from_meters: f64, to_meters: f64) -> f64 {
    from_meters / to_meters
}

/// Convert a length between named units
pub fn convert_length(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    (value * from.meters()) / to.meters()
}
