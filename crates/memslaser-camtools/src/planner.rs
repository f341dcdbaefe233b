//! Pass planning
//!
//! Decides how many drilling passes a polygon needs, how many holes the
//! initial pass has and which spacings the initial and final passes achieve.
//! Every pass after the initial one halves the spacing of the previous pass,
//! so the total hole count is `initial_num_holes * 2^num_extra_passes`.
//!
//! Both roundings (initial hole count and pass count) round half to even.

use memslaser_core::constants::{
    DEFAULT_MAX_INITIAL_HOLE_CANDIDATES, DEFAULT_MAX_TOTAL_HOLES, MIN_INITIAL_NUM_HOLES,
};
use memslaser_core::error::InitialSpacingKind;
use memslaser_core::{PlanningError, PolygonSpacing};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Hole counts and spacings needed to machine one polygon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoleSequencePlan {
    /// Number of passes after the initial pass
    pub num_extra_passes: u32,
    pub initial_num_holes: usize,
    pub total_num_holes: usize,
    pub initial_spacing: f64,
    pub final_spacing: f64,
}

impl HoleSequencePlan {
    /// Build the plan for a given initial hole count
    ///
    /// The pass count is the one whose achieved final spacing is closest to
    /// `target_final_spacing` on a log2 scale.
    pub fn new(
        perimeter: f64,
        initial_num_holes: usize,
        target_final_spacing: f64,
    ) -> Result<Self, PlanningError> {
        let exponent = (perimeter / (initial_num_holes as f64 * target_final_spacing))
            .log2()
            .round_ties_even();
        let num_extra_passes = if exponent > 0.0 { exponent as u32 } else { 0 };

        let overflow = PlanningError::HoleCountOverflow {
            initial_num_holes,
            num_extra_passes,
        };
        let total_num_holes = 2usize
            .checked_pow(num_extra_passes)
            .and_then(|segment_width| segment_width.checked_mul(initial_num_holes))
            .ok_or(overflow)?;

        Ok(Self {
            num_extra_passes,
            initial_num_holes,
            total_num_holes,
            initial_spacing: perimeter / initial_num_holes as f64,
            final_spacing: perimeter / total_num_holes as f64,
        })
    }

    /// Number of passes including the initial pass
    pub fn num_passes(&self) -> usize {
        self.num_extra_passes as usize + 1
    }

    /// Number of final-pass spacings between two initial holes
    pub fn segment_width(&self) -> usize {
        self.total_num_holes / self.initial_num_holes
    }
}

impl fmt::Display for HoleSequencePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Number of passes (including initial pass): {}",
            self.num_passes()
        )?;
        writeln!(f, "Initial number of holes: {}", self.initial_num_holes)?;
        writeln!(f, "Total number of holes: {}", self.total_num_holes)?;
        writeln!(f, "Initial hole spacing: {}", self.initial_spacing)?;
        write!(f, "Final hole spacing: {}", self.final_spacing)
    }
}

/// Plans hole sequences from spacing constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassPlanner {
    max_initial_hole_candidates: usize,
    max_total_holes: usize,
}

impl Default for PassPlanner {
    fn default() -> Self {
        Self {
            max_initial_hole_candidates: DEFAULT_MAX_INITIAL_HOLE_CANDIDATES,
            max_total_holes: DEFAULT_MAX_TOTAL_HOLES,
        }
    }
}

impl PassPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of initial hole counts tried when optimizing
    pub fn with_max_initial_hole_candidates(mut self, limit: usize) -> Self {
        self.max_initial_hole_candidates = limit;
        self
    }

    pub fn max_initial_hole_candidates(&self) -> usize {
        self.max_initial_hole_candidates
    }

    /// Limit the total hole count of a plan
    pub fn with_max_total_holes(mut self, limit: usize) -> Self {
        self.max_total_holes = limit;
        self
    }

    pub fn max_total_holes(&self) -> usize {
        self.max_total_holes
    }

    /// Plan a polygon of the given perimeter
    ///
    /// Uses `spacing.target_initial` when present. Otherwise every initial
    /// hole count allowed by `spacing.min_initial` is tried and the plan whose
    /// final spacing deviates least from `spacing.target_final` wins; ties go
    /// to the smallest initial hole count.
    ///
    /// Plans with more than [`Self::max_total_holes`] holes are rejected.
    pub fn plan(
        &self,
        perimeter: f64,
        spacing: &PolygonSpacing,
    ) -> Result<HoleSequencePlan, PlanningError> {
        let plan = self.select_plan(perimeter, spacing)?;
        if plan.total_num_holes > self.max_total_holes {
            return Err(PlanningError::TooManyHoles {
                perimeter,
                final_spacing: plan.final_spacing,
                total_num_holes: plan.total_num_holes,
                limit: self.max_total_holes,
            });
        }
        Ok(plan)
    }

    fn select_plan(
        &self,
        perimeter: f64,
        spacing: &PolygonSpacing,
    ) -> Result<HoleSequencePlan, PlanningError> {
        require_positive("Polygon perimeter", perimeter)?;
        require_positive("Target final hole spacing", spacing.target_final)?;

        if let Some(target_initial) = spacing.target_initial {
            require_positive("Target initial hole spacing", target_initial)?;
            let initial_num_holes = count_holes((perimeter / target_initial).round_ties_even());
            validate(
                InitialSpacingKind::Target,
                target_initial,
                initial_num_holes,
                perimeter,
                spacing.target_final,
            )?;
            return HoleSequencePlan::new(perimeter, initial_num_holes, spacing.target_final);
        }

        require_positive("Min initial hole spacing", spacing.min_initial)?;
        let max_initial_num_holes = count_holes((perimeter / spacing.min_initial).floor());
        validate(
            InitialSpacingKind::Minimum,
            spacing.min_initial,
            max_initial_num_holes,
            perimeter,
            spacing.target_final,
        )?;

        let candidates = max_initial_num_holes - MIN_INITIAL_NUM_HOLES + 1;
        if candidates > self.max_initial_hole_candidates {
            return Err(PlanningError::TooManyCandidates {
                perimeter,
                min_initial_spacing: spacing.min_initial,
                candidates,
                limit: self.max_initial_hole_candidates,
            });
        }

        let mut best: Option<(f64, HoleSequencePlan)> = None;
        for initial_num_holes in MIN_INITIAL_NUM_HOLES..=max_initial_num_holes {
            let plan = HoleSequencePlan::new(perimeter, initial_num_holes, spacing.target_final)?;
            let deviation = (spacing.target_final - plan.final_spacing).abs();
            if best.map_or(true, |(best_deviation, _)| deviation < best_deviation) {
                best = Some((deviation, plan));
            }
        }

        // candidates >= 1 after validation
        let (deviation, plan) = best.ok_or(PlanningError::TooFewInitialHoles {
            kind: InitialSpacingKind::Minimum,
            initial_spacing: spacing.min_initial,
            perimeter,
            initial_num_holes: max_initial_num_holes,
            min_num_holes: MIN_INITIAL_NUM_HOLES,
        })?;
        debug!(
            candidates,
            initial_num_holes = plan.initial_num_holes,
            deviation,
            "Selected initial hole count"
        );
        Ok(plan)
    }
}

/// Plan with the default candidate limit
pub fn plan_polygon_hole_sequence(
    perimeter: f64,
    min_initial_spacing: f64,
    target_initial_spacing: Option<f64>,
    target_final_spacing: f64,
) -> Result<HoleSequencePlan, PlanningError> {
    PassPlanner::default().plan(
        perimeter,
        &PolygonSpacing {
            min_initial: min_initial_spacing,
            target_initial: target_initial_spacing,
            target_final: target_final_spacing,
        },
    )
}

fn require_positive(name: &'static str, value: f64) -> Result<(), PlanningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlanningError::InvalidInput { name, value })
    }
}

// Saturating conversion of a rounded, non-negative hole count
fn count_holes(value: f64) -> usize {
    value as usize
}

fn validate(
    kind: InitialSpacingKind,
    initial_spacing: f64,
    initial_num_holes: usize,
    perimeter: f64,
    target_final_spacing: f64,
) -> Result<(), PlanningError> {
    if initial_spacing <= target_final_spacing {
        return Err(PlanningError::InitialSpacingNotLarger {
            kind,
            initial_spacing,
            target_final_spacing,
        });
    }
    if initial_num_holes < MIN_INITIAL_NUM_HOLES {
        return Err(PlanningError::TooFewInitialHoles {
            kind,
            initial_spacing,
            perimeter,
            initial_num_holes,
            min_num_holes: MIN_INITIAL_NUM_HOLES,
        });
    }
    Ok(())
}
