//! Error types for the CAM tools crate.
//!
//! Generating the hole sequence of a single polygon can fail while planning
//! or while placing holes. [`SequenceError`] carries either failure without a
//! polygon index; the layout pipeline attaches the index when converting into
//! the crate-wide [`memslaser_core::Error`].

use memslaser_core::{Error, GeometryError, PlanningError};
use thiserror::Error;

/// Errors that can occur while sequencing one polygon.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    /// Spacing constraints are infeasible.
    #[error(transparent)]
    Planning(#[from] PlanningError),

    /// Hole placement arguments were rejected.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl SequenceError {
    /// Attach the index of the polygon that failed.
    pub fn for_polygon(self, polygon_index: usize) -> Error {
        match self {
            SequenceError::Planning(source) => Error::planning(polygon_index, source),
            SequenceError::Geometry(source) => Error::geometry(polygon_index, source),
        }
    }
}

/// Result type alias for polygon sequencing.
pub type SequenceResult<T> = Result<T, SequenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_error_display_is_transparent() {
        let err = SequenceError::from(GeometryError::TooFewPoints { requested: 1 });
        assert_eq!(err.to_string(), "At least 2 holes must be placed, requested 1");
    }

    #[test]
    fn test_for_polygon_keeps_kind() {
        let err = SequenceError::from(PlanningError::InvalidInput {
            name: "Perimeter",
            value: -1.0,
        })
        .for_polygon(4);
        assert!(err.is_planning_error());
        assert_eq!(err.polygon_index(), Some(4));

        let err = SequenceError::from(GeometryError::ZeroPerimeter).for_polygon(0);
        assert!(err.is_geometry_error());
    }
}
