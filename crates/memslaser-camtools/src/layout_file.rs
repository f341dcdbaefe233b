//! JSON layout files
//!
//! A layout file lists polygons in machining order together with the length
//! unit of their coordinates:
//!
//! ```json
//! { "length_unit": 1e-6, "polygons": [[[0, 0], [10, 0], [10, 10]]] }
//! ```
//!
//! The length unit is meters per unit or one of the names `"mm"`, `"um"`
//! and `"nm"`.

use crate::interfaces::LayoutReader;
use memslaser_core::{Error, LengthUnit, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Coordinate unit of a layout file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutUnit {
    Named(LengthUnit),
    /// Meters per coordinate unit
    Meters(f64),
}

impl LayoutUnit {
    pub fn meters(&self) -> f64 {
        match self {
            Self::Named(unit) => unit.meters(),
            Self::Meters(meters) => *meters,
        }
    }
}

/// Layout read from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFile {
    pub length_unit: LayoutUnit,
    /// Vertex rows of every polygon
    pub polygons: Vec<Vec<Vec<f64>>>,
}

impl LayoutFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let layout = Self::from_json_str(&content)?;
        debug!(
            path = %path.display(),
            polygons = layout.polygons.len(),
            "Loaded layout file"
        );
        Ok(layout)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(content)?;
        layout.validate()?;
        Ok(layout)
    }

    fn validate(&self) -> Result<()> {
        let meters = self.length_unit.meters();
        if !(meters.is_finite() && meters > 0.0) {
            return Err(Error::Format(format!(
                "length_unit must be positive, got {}",
                meters
            )));
        }
        if self.polygons.is_empty() {
            return Err(Error::Format("layout contains no polygons".to_string()));
        }
        Ok(())
    }
}

impl LayoutReader for LayoutFile {
    fn length_unit(&self) -> f64 {
        self.length_unit.meters()
    }

    fn polygons(&self) -> Result<Vec<Vec<Vec<f64>>>> {
        Ok(self.polygons.clone())
    }
}
