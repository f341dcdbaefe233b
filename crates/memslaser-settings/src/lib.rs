//! memslaser Settings Crate
//!
//! Handles job configuration files: loading, saving and validation.

pub mod config;
pub mod error;

pub use config::{ConfigFormat, JobConfig, OutputSettings, PlannerSettings};
pub use error::{SettingsError, SettingsResult};
