//! Layout hole sequence assembly
//!
//! Combines the hole sequences of all polygons into one layout-wide sequence.

use crate::interfaces::HoleSequenceAssembler;
use crate::sequence::HoleSequence;
use serde::{Deserialize, Serialize};

/// Machines each polygon to completion before the next one
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialAssembler;

impl HoleSequenceAssembler for SequentialAssembler {
    fn assemble(&self, polygon_sequences: &[HoleSequence]) -> HoleSequence {
        polygon_sequences
            .iter()
            .flat_map(|sequence| sequence.passes().iter().cloned())
            .collect::<Vec<_>>()
            .into()
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}

/// Layout pass `i` is the union of pass `i` of every polygon
///
/// Polygons contribute in machining order. The layout has as many passes as
/// the polygon with the most passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterleavedAssembler;

impl HoleSequenceAssembler for InterleavedAssembler {
    fn assemble(&self, polygon_sequences: &[HoleSequence]) -> HoleSequence {
        let max_passes = polygon_sequences
            .iter()
            .map(HoleSequence::num_passes)
            .max()
            .unwrap_or(0);
        let mut passes = vec![Vec::new(); max_passes];
        for sequence in polygon_sequences {
            for (layout_pass, polygon_pass) in passes.iter_mut().zip(sequence.passes()) {
                layout_pass.extend_from_slice(polygon_pass);
            }
        }
        HoleSequence::from_passes(passes)
    }

    fn name(&self) -> &'static str {
        "interleaved"
    }
}

/// Assembly strategy selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyStrategy {
    #[default]
    Sequential,
    Interleaved,
}

impl AssemblyStrategy {
    pub fn assembler(&self) -> Box<dyn HoleSequenceAssembler> {
        match self {
            Self::Sequential => Box::new(SequentialAssembler),
            Self::Interleaved => Box::new(InterleavedAssembler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memslaser_core::Point;

    fn sequence(tag: f64, pass_sizes: &[usize]) -> HoleSequence {
        pass_sizes
            .iter()
            .enumerate()
            .map(|(pass, &size)| vec![Point::new(tag, pass as f64); size])
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_sequential_concatenates_passes() {
        let layout = SequentialAssembler.assemble(&[sequence(1.0, &[2, 2]), sequence(2.0, &[3])]);
        assert_eq!(layout.num_passes(), 3);
        assert_eq!(layout.passes()[1][0], Point::new(1.0, 1.0));
        assert_eq!(layout.passes()[2], vec![Point::new(2.0, 0.0); 3]);
    }

    #[test]
    fn test_interleaved_unions_passes() {
        let layout = InterleavedAssembler.assemble(&[
            sequence(1.0, &[2, 2, 4]),
            sequence(2.0, &[3]),
        ]);
        assert_eq!(layout.num_passes(), 3);
        assert_eq!(layout.passes()[0].len(), 5);
        assert_eq!(layout.passes()[0][2], Point::new(2.0, 0.0));
        assert_eq!(layout.passes()[2].len(), 4);
        assert_eq!(layout.num_holes(), 11);
    }

    #[test]
    fn test_empty_layout() {
        assert!(InterleavedAssembler.assemble(&[]).is_empty());
        assert!(SequentialAssembler.assemble(&[]).is_empty());
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(AssemblyStrategy::default().assembler().name(), "sequential");
        assert_eq!(
            AssemblyStrategy::Interleaved.assembler().name(),
            "interleaved"
        );
        let parsed: AssemblyStrategy = serde_json::from_str("\"interleaved\"").unwrap();
        assert_eq!(parsed, AssemblyStrategy::Interleaved);
    }
}
