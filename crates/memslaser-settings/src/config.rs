//! Job configuration
//!
//! A job names the layout file, how to register it to the membrane, the hole
//! spacing, the assembly strategy and where to write the program. Jobs are
//! stored as TOML or JSON, chosen by file extension:
//!
//! ```toml
//! layout = "layout.json"
//! assembly = "interleaved"
//!
//! [alignment]
//! nominal_side_length = 100.0
//! dx = 99.8
//! dy = 0.4
//!
//! [spacing]
//! target_final = 0.5
//!
//! [output]
//! path = "layout.pgm"
//! ```

use crate::error::{SettingsError, SettingsResult};
use memslaser_camtools::{
    AeroBasicParameters, AssemblyStrategy, MembraneCornerAligner, MembraneCornerMeasurement,
    PassPlanner,
};
use memslaser_core::constants::{DEFAULT_MAX_INITIAL_HOLE_CANDIDATES, DEFAULT_MAX_TOTAL_HOLES};
use memslaser_core::{HoleSpacingOverrides, SpacingValue, Transformation};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format implied by the file extension
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                other.unwrap_or("no extension")
            ))),
        }
    }
}

/// Planner limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Upper bound on initial hole counts tried when optimizing
    pub max_initial_hole_candidates: usize,
    /// Upper bound on the total hole count of one polygon
    pub max_total_holes: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            max_initial_hole_candidates: DEFAULT_MAX_INITIAL_HOLE_CANDIDATES,
            max_total_holes: DEFAULT_MAX_TOTAL_HOLES,
        }
    }
}

/// Program output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// AeroBasic program path
    pub path: PathBuf,
    #[serde(default)]
    pub aerobasic: AeroBasicParameters,
}

/// Complete job configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// JSON layout file
    pub layout: PathBuf,
    #[serde(default)]
    pub assembly: AssemblyStrategy,
    /// Base path of the dated run log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_log: Option<PathBuf>,
    /// Applied in order before alignment, in micrometers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transformations: Vec<Transformation>,
    /// Membrane measurement in micrometers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<MembraneCornerMeasurement>,
    /// Hole spacings in micrometers
    #[serde(default)]
    pub spacing: HoleSpacingOverrides,
    #[serde(default)]
    pub planner: PlannerSettings,
    pub output: OutputSettings,
}

impl JobConfig {
    pub fn new(layout: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            layout: layout.into(),
            assembly: AssemblyStrategy::default(),
            run_log: None,
            transformations: Vec::new(),
            alignment: None,
            spacing: HoleSpacingOverrides::default(),
            planner: PlannerSettings::default(),
            output: OutputSettings {
                path: output.into(),
                aerobasic: AeroBasicParameters::default(),
            },
        }
    }

    /// Load config from file (JSON or TOML)
    ///
    /// Relative paths inside the file are resolved against the directory
    /// containing it.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let mut config = Self::parse(&content, format)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_paths(base);
        }
        config.validate()?;
        debug!(path = %path.display(), "Loaded job configuration");
        Ok(config)
    }

    /// Parse config text in the given format without validating it
    pub fn parse(content: &str, format: ConfigFormat) -> SettingsResult<Self> {
        Ok(match format {
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        })
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| SettingsError::SaveError(e.to_string()))?,
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| SettingsError::SaveError(e.to_string()))?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.layout);
        resolve(&mut self.output.path);
        if let Some(run_log) = self.run_log.as_mut() {
            resolve(run_log);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.layout.as_os_str().is_empty() {
            return Err(SettingsError::invalid("layout", "path must not be empty"));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(SettingsError::invalid("output.path", "path must not be empty"));
        }

        for (index, transformation) in self.transformations.iter().enumerate() {
            let values = match *transformation {
                Transformation::Translation { dx, dy } => vec![dx, dy],
                Transformation::Scaling { sx, sy } => vec![sx, sy],
                Transformation::Rotation { angle_rad } => vec![angle_rad],
            };
            if values.iter().any(|v| !v.is_finite()) {
                return Err(SettingsError::invalid(
                    format!("transformations[{}]", index),
                    "values must be finite",
                ));
            }
        }

        if self.alignment.is_some() {
            self.aligner()?;
        }

        let spacing = [
            ("spacing.min_initial", &self.spacing.min_initial),
            ("spacing.target_initial", &self.spacing.target_initial),
            ("spacing.target_final", &self.spacing.target_final),
        ];
        for (key, value) in spacing {
            let values: &[f64] = match value {
                None => &[],
                Some(SpacingValue::Uniform(v)) => std::slice::from_ref(v),
                Some(SpacingValue::PerPolygon(vs)) => vs,
            };
            if let Some(v) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
                return Err(SettingsError::invalid(
                    key,
                    format!("must be positive, got {}", v),
                ));
            }
        }

        if self.planner.max_initial_hole_candidates == 0 {
            return Err(SettingsError::invalid(
                "planner.max_initial_hole_candidates",
                "must be > 0",
            ));
        }
        if self.planner.max_total_holes == 0 {
            return Err(SettingsError::invalid("planner.max_total_holes", "must be > 0"));
        }

        self.output.aerobasic.validate()?;
        Ok(())
    }

    /// Membrane aligner, if alignment is configured
    pub fn aligner(&self) -> SettingsResult<Option<MembraneCornerAligner>> {
        self.alignment
            .map(|measurement| {
                MembraneCornerAligner::new(measurement)
                    .map_err(|e| SettingsError::invalid("alignment", e.to_string()))
            })
            .transpose()
    }

    pub fn pass_planner(&self) -> PassPlanner {
        PassPlanner::new()
            .with_max_initial_hole_candidates(self.planner.max_initial_hole_candidates)
            .with_max_total_holes(self.planner.max_total_holes)
    }
}
