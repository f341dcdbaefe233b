//! Error handling for memslaser
//!
//! Provides error types for all layers of the planner:
//! - Planning errors (infeasible spacing constraints)
//! - Geometry errors (malformed vertex arrays, invalid placement arguments)
//! - Alignment errors (membrane measurements that cannot be registered)
//! - Configuration errors (spacing overrides, units)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::fmt;
use thiserror::Error;

/// Which initial spacing value a planning constraint was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialSpacingKind {
    /// Explicit target initial spacing supplied by the user
    Target,
    /// Lower bound used when the initial spacing is optimized
    Minimum,
}

impl fmt::Display for InitialSpacingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target => write!(f, "Target initial hole spacing"),
            Self::Minimum => write!(f, "Min initial hole spacing"),
        }
    }
}

/// Planning error type
///
/// Raised when the spacing constraints of a polygon are geometrically
/// infeasible. Every variant carries the offending values so the user can
/// adjust the spacing parameters and re-run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    /// Initial spacing does not exceed the final spacing
    #[error("{kind} ({initial_spacing}) must be larger than target final hole spacing ({target_final_spacing})")]
    InitialSpacingNotLarger {
        /// Which initial spacing was checked.
        kind: InitialSpacingKind,
        /// The initial spacing value.
        initial_spacing: f64,
        /// The requested final spacing.
        target_final_spacing: f64,
    },

    /// Initial spacing is too large for the perimeter
    #[error("{kind} ({initial_spacing}) is too large for polygon perimeter ({perimeter}); yielded {initial_num_holes} initial holes, at least {min_num_holes} are required")]
    TooFewInitialHoles {
        /// Which initial spacing was checked.
        kind: InitialSpacingKind,
        /// The initial spacing value.
        initial_spacing: f64,
        /// The polygon perimeter.
        perimeter: f64,
        /// Number of initial holes the spacing yields.
        initial_num_holes: usize,
        /// Minimum number of initial holes.
        min_num_holes: usize,
    },

    /// Optimization would evaluate more candidates than allowed
    #[error("Min initial hole spacing ({min_initial_spacing}) yields {candidates} candidate initial hole counts for polygon perimeter ({perimeter}), limit is {limit}")]
    TooManyCandidates {
        /// The polygon perimeter.
        perimeter: f64,
        /// The minimum initial spacing.
        min_initial_spacing: f64,
        /// Number of candidates the search would evaluate.
        candidates: usize,
        /// Configured candidate limit.
        limit: usize,
    },

    /// Plan needs more holes than allowed
    #[error("Polygon perimeter ({perimeter}) needs {total_num_holes} holes at final hole spacing ({final_spacing}), limit is {limit}")]
    TooManyHoles {
        /// The polygon perimeter.
        perimeter: f64,
        /// Achieved final spacing.
        final_spacing: f64,
        /// Total hole count of the plan.
        total_num_holes: usize,
        /// Configured hole limit.
        limit: usize,
    },

    /// Total hole count does not fit the index space
    #[error("Hole count overflow: {initial_num_holes} initial holes with {num_extra_passes} extra passes")]
    HoleCountOverflow {
        /// Initial hole count.
        initial_num_holes: usize,
        /// Number of passes after the initial pass.
        num_extra_passes: u32,
    },

    /// A numeric input is not positive and finite
    #[error("{name} must be positive and finite, got {value}")]
    InvalidInput {
        /// Name of the input.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Geometry error type
///
/// Represents malformed vertex arrays and invalid placement arguments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Polygon has fewer than three vertices
    #[error("Polygon must have at least 3 vertices, found {found}")]
    TooFewVertices {
        /// Number of vertices provided.
        found: usize,
    },

    /// A vertex row is not a coordinate pair
    #[error("Vertex {vertex_index} violates [N][2] shape requirement: found {found} coordinates")]
    WrongDimensionality {
        /// Index of the malformed vertex.
        vertex_index: usize,
        /// Number of coordinates in the row.
        found: usize,
    },

    /// A coordinate is NaN or infinite
    #[error("Vertex {vertex_index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the malformed vertex.
        vertex_index: usize,
    },

    /// All vertices coincide
    #[error("Polygon perimeter is zero")]
    ZeroPerimeter,

    /// Placement spacing is not positive and finite
    #[error("Hole spacing must be positive and finite, got {spacing}")]
    InvalidSpacing {
        /// The rejected spacing.
        spacing: f64,
    },

    /// Placement requested fewer than two points
    #[error("At least 2 holes must be placed, requested {requested}")]
    TooFewPoints {
        /// The requested number of points.
        requested: usize,
    },
}

/// Alignment error type
///
/// Represents membrane measurements that cannot be turned into a layout
/// registration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    /// Measured membrane edge is rotated by more than 45 degrees
    #[error("Wrong corners chosen, membrane angle ({angle_deg} degrees) is not within [-45, 45] degrees")]
    AngleOutOfRange {
        /// The measured angle in degrees.
        angle_deg: f64,
    },

    /// Nominal side length is not positive and finite
    #[error("Nominal membrane side length must be positive and finite, got {value}")]
    InvalidSideLength {
        /// The rejected side length.
        value: f64,
    },

    /// Measured corner displacement is zero
    #[error("Measured corner displacement must be non-zero")]
    ZeroDisplacement,
}

/// Configuration error type
///
/// Represents invalid spacing overrides, units, and settings values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Per-polygon list length differs from the polygon count
    #[error("Length of {name} list ({found}) does not equal the number of polygons ({expected})")]
    LengthMismatch {
        /// Name of the setting.
        name: &'static str,
        /// Number of polygons.
        expected: usize,
        /// Length of the supplied list.
        found: usize,
    },

    /// A setting value is out of range
    #[error("Invalid value for '{name}': {value}")]
    InvalidValue {
        /// Name of the setting.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// Length unit name is not recognized
    #[error("Unit '{0}' is unrecognized, use one of: mm, um, nm")]
    UnknownUnit(String),
}

/// Main error type for memslaser
///
/// A unified error type that can represent any error from all layers.
/// Planning and geometry failures carry the index of the polygon they
/// belong to; it is displayed 1-based.
#[derive(Error, Debug)]
pub enum Error {
    /// Planning failed for one polygon
    #[error("Polygon hole sequence could not be generated for polygon {}: {source}", .polygon_index + 1)]
    Planning {
        /// Zero-based index of the failed polygon.
        polygon_index: usize,
        /// The underlying planning error.
        source: PlanningError,
    },

    /// A polygon's geometry was rejected
    #[error("Invalid geometry for polygon {}: {source}", .polygon_index + 1)]
    Geometry {
        /// Zero-based index of the failed polygon.
        polygon_index: usize,
        /// The underlying geometry error.
        source: GeometryError,
    },

    /// Alignment error
    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An operation was invoked before its prerequisite
    #[error("{prerequisite} before invoking {method}()")]
    InvalidState {
        /// What has to happen first.
        prerequisite: &'static str,
        /// The operation that was invoked.
        method: &'static str,
    },

    /// Input or output file has unusable content
    #[error("File format error: {0}")]
    Format(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Attach a polygon index to a planning error
    pub fn planning(polygon_index: usize, source: PlanningError) -> Self {
        Error::Planning {
            polygon_index,
            source,
        }
    }

    /// Attach a polygon index to a geometry error
    pub fn geometry(polygon_index: usize, source: GeometryError) -> Self {
        Error::Geometry {
            polygon_index,
            source,
        }
    }

    /// Index of the polygon this error belongs to, if any
    pub fn polygon_index(&self) -> Option<usize> {
        match self {
            Error::Planning { polygon_index, .. } | Error::Geometry { polygon_index, .. } => {
                Some(*polygon_index)
            }
            _ => None,
        }
    }

    /// Check if this is a planning error
    pub fn is_planning_error(&self) -> bool {
        matches!(self, Error::Planning { .. })
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry { .. })
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
