//! Hole sequences
//!
//! A [`HoleSequence`] is an ordered list of passes, each an ordered list of
//! holes. It describes one polygon as well as a whole assembled layout.

use memslaser_core::Point;
use serde::{Deserialize, Serialize};

/// Pass-ordered hole coordinates; pass 0 is the initial pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoleSequence {
    passes: Vec<Vec<Point>>,
}

impl HoleSequence {
    pub fn from_passes(passes: Vec<Vec<Point>>) -> Self {
        Self { passes }
    }

    /// Gather holes by the indices of each pass
    ///
    /// Every index must be within `holes`.
    pub fn from_indices(holes: &[Point], schedule: &[Vec<usize>]) -> Self {
        let passes = schedule
            .iter()
            .map(|pass| pass.iter().map(|&index| holes[index]).collect())
            .collect();
        Self { passes }
    }

    pub fn passes(&self) -> &[Vec<Point>] {
        &self.passes
    }

    pub fn num_passes(&self) -> usize {
        self.passes.len()
    }

    /// Total number of holes over all passes
    pub fn num_holes(&self) -> usize {
        self.passes.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.num_holes() == 0
    }

    /// Holes in drilling order
    pub fn holes(&self) -> impl Iterator<Item = &Point> + '_ {
        self.passes.iter().flatten()
    }
}

impl From<Vec<Vec<Point>>> for HoleSequence {
    fn from(passes: Vec<Vec<Point>>) -> Self {
        Self::from_passes(passes)
    }
}
