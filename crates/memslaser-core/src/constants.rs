//! Constants that define default behaviour.
//!
//! Spacing values are expressed in [`WORKING_LENGTH_UNIT`] and measured between
//! the centers of adjacent holes along a polygon perimeter.

use crate::units::LengthUnit;

/// Length unit used for the constants below, in meters per unit (micrometers)
pub const WORKING_LENGTH_UNIT: f64 = LengthUnit::Micrometer.meters();

/// Diameter of a single laser-machined hole
pub const HOLE_DIAMETER: f64 = 1.0;

/// Default lower bound on the initial pass spacing when the initial spacing is optimized
pub const DEFAULT_MIN_INITIAL_HOLE_SPACING: f64 = HOLE_DIAMETER + 5.0;

/// Default target spacing of the final pass
pub const DEFAULT_TARGET_FINAL_HOLE_SPACING: f64 = HOLE_DIAMETER / 2.0;

/// Initial spacing is only defined for at least this many initial holes
pub const MIN_INITIAL_NUM_HOLES: usize = 2;

/// Upper bound on candidate initial hole counts evaluated when optimizing
pub const DEFAULT_MAX_INITIAL_HOLE_CANDIDATES: usize = 100_000;

/// Upper bound on the total hole count of one polygon
pub const DEFAULT_MAX_TOTAL_HOLES: usize = 10_000_000;
