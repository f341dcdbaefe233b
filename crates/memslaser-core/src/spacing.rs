//! Hole spacing configuration
//!
//! Spacing settings are given either as one value shared by every polygon or
//! as one value per polygon. Overrides are merged into a [`LayoutSpacing`]
//! field by field; absent fields keep their previous value so overrides can be
//! applied several times. Defaults are bound when the layout is resolved.

use crate::constants::{DEFAULT_MIN_INITIAL_HOLE_SPACING, DEFAULT_TARGET_FINAL_HOLE_SPACING};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// A spacing value shared by all polygons or given per polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpacingValue {
    /// Same value for every polygon
    Uniform(f64),
    /// One value per polygon, in machining order
    PerPolygon(Vec<f64>),
}

impl SpacingValue {
    /// Expand to one value per polygon
    fn expand(&self, name: &'static str, num_polygons: usize) -> Result<Vec<f64>, ConfigError> {
        let values = match self {
            Self::Uniform(value) => vec![*value; num_polygons],
            Self::PerPolygon(values) => {
                if values.len() != num_polygons {
                    return Err(ConfigError::LengthMismatch {
                        name,
                        expected: num_polygons,
                        found: values.len(),
                    });
                }
                values.clone()
            }
        };
        if let Some(value) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(ConfigError::InvalidValue {
                name: name.to_string(),
                value: *value,
            });
        }
        Ok(values)
    }
}

impl From<f64> for SpacingValue {
    fn from(value: f64) -> Self {
        Self::Uniform(value)
    }
}

impl From<Vec<f64>> for SpacingValue {
    fn from(values: Vec<f64>) -> Self {
        Self::PerPolygon(values)
    }
}

/// Optional spacing overrides
///
/// Leaving `target_initial` unset lets the planner choose the initial spacing
/// that brings the final spacing closest to its target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleSpacingOverrides {
    /// Lower bound on the initial pass spacing when it is optimized
    pub min_initial: Option<SpacingValue>,
    /// Explicit initial pass spacing
    pub target_initial: Option<SpacingValue>,
    /// Target final pass spacing
    pub target_final: Option<SpacingValue>,
}

impl HoleSpacingOverrides {
    pub fn with_min_initial(mut self, value: impl Into<SpacingValue>) -> Self {
        self.min_initial = Some(value.into());
        self
    }

    pub fn with_target_initial(mut self, value: impl Into<SpacingValue>) -> Self {
        self.target_initial = Some(value.into());
        self
    }

    pub fn with_target_final(mut self, value: impl Into<SpacingValue>) -> Self {
        self.target_final = Some(value.into());
        self
    }
}

/// Spacing constraints of a single polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonSpacing {
    pub min_initial: f64,
    /// `None` selects optimization of the initial spacing
    pub target_initial: Option<f64>,
    pub target_final: f64,
}

impl Default for PolygonSpacing {
    fn default() -> Self {
        Self {
            min_initial: DEFAULT_MIN_INITIAL_HOLE_SPACING,
            target_initial: None,
            target_final: DEFAULT_TARGET_FINAL_HOLE_SPACING,
        }
    }
}

/// Per-polygon spacing state of a layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSpacing {
    min_initial: Option<Vec<f64>>,
    target_initial: Option<Vec<f64>>,
    target_final: Option<Vec<f64>>,
}

impl LayoutSpacing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge overrides, validating list lengths against the polygon count
    ///
    /// Nothing is modified when any override is rejected.
    pub fn merge(
        &mut self,
        overrides: &HoleSpacingOverrides,
        num_polygons: usize,
    ) -> Result<(), ConfigError> {
        let expand = |value: &Option<SpacingValue>, name| {
            value
                .as_ref()
                .map(|v| v.expand(name, num_polygons))
                .transpose()
        };
        let min_initial = expand(&overrides.min_initial, "min initial hole spacing")?;
        let target_initial = expand(&overrides.target_initial, "target initial hole spacing")?;
        let target_final = expand(&overrides.target_final, "target final hole spacing")?;

        if min_initial.is_some() {
            self.min_initial = min_initial;
        }
        if target_initial.is_some() {
            self.target_initial = target_initial;
        }
        if target_final.is_some() {
            self.target_final = target_final;
        }
        tracing::debug!(num_polygons, "Merged hole spacing overrides");
        Ok(())
    }

    /// Spacing of every polygon with defaults bound for unset fields
    ///
    /// Stored lists always match the polygon count they were merged with;
    /// `num_polygons` must be that count.
    pub fn resolve(&self, num_polygons: usize) -> Vec<PolygonSpacing> {
        let pick = |values: &Option<Vec<f64>>, index: usize| {
            values.as_ref().and_then(|v| v.get(index).copied())
        };
        (0..num_polygons)
            .map(|i| PolygonSpacing {
                min_initial: pick(&self.min_initial, i).unwrap_or(DEFAULT_MIN_INITIAL_HOLE_SPACING),
                target_initial: pick(&self.target_initial, i),
                target_final: pick(&self.target_final, i)
                    .unwrap_or(DEFAULT_TARGET_FINAL_HOLE_SPACING),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_bound_on_resolve() {
        let spacing = LayoutSpacing::new().resolve(2);
        assert_eq!(spacing, vec![PolygonSpacing::default(); 2]);
        assert_eq!(spacing[0].min_initial, 6.0);
        assert_eq!(spacing[0].target_final, 0.5);
        assert_eq!(spacing[0].target_initial, None);
    }

    #[test]
    fn test_uniform_and_per_polygon_values() {
        let mut spacing = LayoutSpacing::new();
        let overrides = HoleSpacingOverrides::default()
            .with_target_initial(vec![10.0, 12.0, 14.0])
            .with_target_final(2.5);
        spacing.merge(&overrides, 3).unwrap();

        let resolved = spacing.resolve(3);
        assert_eq!(resolved[1].target_initial, Some(12.0));
        assert!(resolved.iter().all(|s| s.target_final == 2.5));
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let mut spacing = LayoutSpacing::new();
        spacing
            .merge(&HoleSpacingOverrides::default().with_target_final(1.0), 1)
            .unwrap();
        spacing
            .merge(&HoleSpacingOverrides::default().with_min_initial(8.0), 1)
            .unwrap();

        let resolved = spacing.resolve(1);
        assert_eq!(resolved[0].target_final, 1.0);
        assert_eq!(resolved[0].min_initial, 8.0);
    }

    #[test]
    fn test_length_mismatch_rejected_without_partial_update() {
        let mut spacing = LayoutSpacing::new();
        let overrides = HoleSpacingOverrides::default()
            .with_target_final(1.0)
            .with_min_initial(vec![6.0, 7.0]);
        let err = spacing.merge(&overrides, 3).unwrap_err();
        assert_eq!(
            err,
            ConfigError::LengthMismatch {
                name: "min initial hole spacing",
                expected: 3,
                found: 2
            }
        );
        assert_eq!(spacing, LayoutSpacing::new());
    }

    #[test]
    fn test_non_positive_value_rejected() {
        let mut spacing = LayoutSpacing::new();
        let err = spacing
            .merge(&HoleSpacingOverrides::default().with_target_final(0.0), 1)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_deserialize_overrides() {
        let overrides: HoleSpacingOverrides =
            serde_json::from_str(r#"{"min_initial": 6.0, "target_final": [0.5, 0.25]}"#).unwrap();
        assert_eq!(overrides.min_initial, Some(SpacingValue::Uniform(6.0)));
        assert_eq!(
            overrides.target_final,
            Some(SpacingValue::PerPolygon(vec![0.5, 0.25]))
        );
        assert_eq!(overrides.target_initial, None);
    }
}
