//! # memslaser Core
//!
//! Core types and utilities shared by the memslaser crates.
//! Provides the 2D geometry model, affine layout transformations,
//! length units, hole spacing configuration and the error hierarchy.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod spacing;
pub mod transform;
pub mod units;

pub use error::{
    AlignmentError, ConfigError, Error, GeometryError, InitialSpacingKind, PlanningError, Result,
};

pub use geometry::{Point, Polygon};

pub use spacing::{HoleSpacingOverrides, LayoutSpacing, PolygonSpacing, SpacingValue};

pub use transform::Transformation;

pub use units::{convert_length, unit_conversion_factor, LengthUnit};
