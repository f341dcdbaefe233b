//! Collaborator interfaces
//!
//! The layout pipeline talks to readers, aligners, assemblers and writers
//! only through these traits. Length units are meters per unit (e.g. `1e-6`
//! for micrometers).

use crate::sequence::HoleSequence;
use memslaser_core::{Result, Transformation};

/// Source of layout geometry
pub trait LayoutReader {
    /// Length unit of the coordinates, in meters per unit
    fn length_unit(&self) -> f64;

    /// Polygons as coordinate rows, sorted in machining order
    ///
    /// Every row is expected to hold exactly two coordinates; callers
    /// validate the row width.
    fn polygons(&self) -> Result<Vec<Vec<Vec<f64>>>>;
}

/// Registration of a layout to the physical substrate
pub trait LayoutAligner {
    /// Transformations applied in list order to every vertex
    fn transformations(&self) -> Vec<Transformation>;

    /// Human-readable description of the alignment inputs
    fn describe(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Merge policy for per-polygon hole sequences
pub trait HoleSequenceAssembler {
    /// Combine polygon sequences, given in machining order, into one layout sequence
    fn assemble(&self, polygon_sequences: &[HoleSequence]) -> HoleSequence;

    fn name(&self) -> &'static str;
}

/// Machine program output
pub trait NumericalControlWriter {
    /// Length unit expected by [`add_hole`](Self::add_hole), in meters per unit
    fn length_unit(&self) -> f64;

    /// Append one hole in final drilling order
    fn add_hole(&mut self, x: f64, y: f64);

    /// Write the program
    fn finish(&mut self) -> Result<()>;

    /// Human-readable description of the writer parameters
    fn describe(&self) -> Vec<String> {
        Vec::new()
    }
}
