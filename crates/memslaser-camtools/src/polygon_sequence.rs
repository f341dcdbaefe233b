//! Polygon hole sequence generator
//!
//! Runs planning, placement and scheduling for a single polygon.

use crate::error::SequenceResult;
use crate::placement::place_polygon_holes;
use crate::planner::{HoleSequencePlan, PassPlanner};
use crate::scheduler::{schedule_hole_indices, SegmentTemplate};
use crate::sequence::HoleSequence;
use memslaser_core::{Polygon, PolygonSpacing};
use serde::Serialize;
use tracing::debug;

/// Plan and drilling order of one polygon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedPolygon {
    pub plan: HoleSequencePlan,
    pub sequence: HoleSequence,
}

/// Generator for polygon hole sequences
#[derive(Debug, Clone, Default)]
pub struct PolygonHoleSequenceGenerator {
    planner: PassPlanner,
}

impl PolygonHoleSequenceGenerator {
    pub fn new(planner: PassPlanner) -> Self {
        Self { planner }
    }

    pub fn planner(&self) -> &PassPlanner {
        &self.planner
    }

    /// Generate the hole sequence of a polygon
    pub fn generate(
        &self,
        polygon: &Polygon,
        spacing: &PolygonSpacing,
    ) -> SequenceResult<PlannedPolygon> {
        let plan = self.planner.plan(polygon.perimeter(), spacing)?;
        let holes = place_polygon_holes(polygon, plan.total_num_holes, plan.final_spacing)?;
        let template = SegmentTemplate::new(plan.num_extra_passes);
        let schedule = schedule_hole_indices(&template, plan.initial_num_holes);
        let sequence = HoleSequence::from_indices(&holes, &schedule);

        debug!(
            passes = sequence.num_passes(),
            holes = sequence.num_holes(),
            "Generated polygon hole sequence"
        );
        Ok(PlannedPolygon { plan, sequence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SequenceError;
    use memslaser_core::{Point, PlanningError};

    fn square() -> Polygon {
        Polygon::from_rows(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]).unwrap()
    }

    #[test]
    fn test_square_sequence() {
        let spacing = PolygonSpacing {
            min_initial: 6.0,
            target_initial: Some(10.0),
            target_final: 2.5,
        };
        let planned = PolygonHoleSequenceGenerator::default()
            .generate(&square(), &spacing)
            .unwrap();

        assert_eq!(planned.plan.total_num_holes, 16);
        let passes = planned.sequence.passes();
        assert_eq!(passes.len(), 3);
        assert_eq!(
            passes[0],
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]
        );
        assert_eq!(passes[1][0], Point::new(5.0, 0.0));
        assert_eq!(passes[2].len(), 8);
        assert_eq!(planned.sequence.num_holes(), 16);
    }

    #[test]
    fn test_infeasible_spacing_yields_no_sequence() {
        let spacing = PolygonSpacing {
            min_initial: 6.0,
            target_initial: Some(3.0),
            target_final: 5.0,
        };
        let err = PolygonHoleSequenceGenerator::default()
            .generate(&square(), &spacing)
            .unwrap_err();
        assert!(matches!(
            err,
            SequenceError::Planning(PlanningError::InitialSpacingNotLarger { .. })
        ));
    }
}
