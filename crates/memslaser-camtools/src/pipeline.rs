//! Layout to numerical control pipeline
//!
//! Orchestrates a layout from loaded polygons to a written machine program:
//! transform or align the layout, set hole spacing, generate the layout-wide
//! hole sequence and write it. Any change to geometry or spacing discards
//! previously generated sequences.
//!
//! Polygons are held in [`WORKING_LENGTH_UNIT`] whatever unit the layout uses,
//! so spacings, transformations and alignment measurements are all given in
//! micrometers.

use crate::interfaces::{HoleSequenceAssembler, LayoutAligner, LayoutReader, NumericalControlWriter};
use crate::listener::SequenceListener;
use crate::polygon_sequence::{PlannedPolygon, PolygonHoleSequenceGenerator};
use crate::planner::PassPlanner;
use crate::sequence::HoleSequence;
use memslaser_core::constants::WORKING_LENGTH_UNIT;
use memslaser_core::{
    unit_conversion_factor, ConfigError, Error, HoleSpacingOverrides, LayoutSpacing, Polygon,
    PolygonSpacing, Result, Transformation,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Layout pipeline state
pub struct LayoutPipeline {
    length_unit: f64,
    polygons: Vec<Polygon>,
    spacing: LayoutSpacing,
    generator: PolygonHoleSequenceGenerator,
    listeners: Vec<Arc<dyn SequenceListener>>,
    planned_polygons: Option<Vec<PlannedPolygon>>,
    layout_hole_sequence: Option<HoleSequence>,
}

impl LayoutPipeline {
    /// Create a pipeline for polygons given in machining order
    ///
    /// `length_unit` is the coordinate unit in meters per unit. Coordinates
    /// are converted to the working unit.
    pub fn new(length_unit: f64, mut polygons: Vec<Polygon>) -> Result<Self> {
        if !(length_unit.is_finite() && length_unit > 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "length_unit".to_string(),
                value: length_unit,
            }
            .into());
        }
        let factor = unit_conversion_factor(length_unit, WORKING_LENGTH_UNIT);
        if factor != 1.0 {
            for polygon in &mut polygons {
                polygon.scale(factor, factor);
            }
        }
        info!(
            polygons = polygons.len(),
            length_unit, "Layout loaded"
        );
        Ok(Self {
            length_unit: WORKING_LENGTH_UNIT,
            polygons,
            spacing: LayoutSpacing::new(),
            generator: PolygonHoleSequenceGenerator::default(),
            listeners: Vec::new(),
            planned_polygons: None,
            layout_hole_sequence: None,
        })
    }

    /// Create a pipeline from coordinate rows of shape `[N][2]` per polygon
    pub fn from_rows<R: AsRef<[f64]>>(length_unit: f64, polygons: &[Vec<R>]) -> Result<Self> {
        let polygons = polygons
            .iter()
            .enumerate()
            .map(|(index, rows)| Polygon::from_rows(rows).map_err(|e| Error::geometry(index, e)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(length_unit, polygons)
    }

    /// Create a pipeline from a layout reader, adopting its length unit
    pub fn from_reader(reader: &dyn LayoutReader) -> Result<Self> {
        Self::from_rows(reader.length_unit(), &reader.polygons()?)
    }

    /// Use a planner with custom limits
    pub fn with_planner(mut self, planner: PassPlanner) -> Self {
        self.generator = PolygonHoleSequenceGenerator::new(planner);
        self
    }

    pub fn add_listener(&mut self, listener: Arc<dyn SequenceListener>) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    /// Unit of the held coordinates, always [`WORKING_LENGTH_UNIT`]
    pub fn length_unit(&self) -> f64 {
        self.length_unit
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    /// Spacing of every polygon, defaults bound
    pub fn hole_spacing(&self) -> Vec<PolygonSpacing> {
        self.spacing.resolve(self.polygons.len())
    }

    /// Per-polygon plans and sequences of the last generation
    pub fn planned_polygons(&self) -> Option<&[PlannedPolygon]> {
        self.planned_polygons.as_deref()
    }

    pub fn layout_hole_sequence(&self) -> Option<&HoleSequence> {
        self.layout_hole_sequence.as_ref()
    }

    fn invalidate(&mut self) {
        self.planned_polygons = None;
        self.layout_hole_sequence = None;
    }

    /// Apply a transformation to every polygon
    pub fn transform(&mut self, transformation: &Transformation) -> &mut Self {
        for polygon in &mut self.polygons {
            polygon.transform(transformation);
        }
        debug!(%transformation, "Transformed layout");
        self.invalidate();
        self
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.transform(&Transformation::Translation { dx, dy })
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.transform(&Transformation::Scaling { sx, sy })
    }

    /// Rotate counter-clockwise about the origin
    pub fn rotate(&mut self, angle_rad: f64) -> &mut Self {
        self.transform(&Transformation::Rotation { angle_rad })
    }

    /// Register the layout to the physical substrate
    pub fn align(&mut self, aligner: &dyn LayoutAligner) -> &mut Self {
        let transformations = aligner.transformations();
        for transformation in &transformations {
            self.transform(transformation);
        }
        let description = aligner.describe();
        for listener in &self.listeners {
            listener.on_layout_aligned(&transformations, &description);
        }
        self
    }

    /// Merge spacing overrides
    ///
    /// Per-polygon lists must have one value per polygon. Nothing changes
    /// when an override is rejected.
    pub fn set_hole_spacing(&mut self, overrides: &HoleSpacingOverrides) -> Result<&mut Self> {
        self.spacing.merge(overrides, self.polygons.len())?;
        self.invalidate();
        Ok(self)
    }

    /// Generate every polygon's sequence and assemble the layout sequence
    ///
    /// Fails on the first polygon that cannot be sequenced; the error names
    /// that polygon and no sequence is kept.
    pub fn generate_hole_sequence(
        &mut self,
        assembler: &dyn HoleSequenceAssembler,
    ) -> Result<&HoleSequence> {
        self.invalidate();
        let spacings = self.hole_spacing();

        let mut planned = Vec::with_capacity(self.polygons.len());
        for (index, (polygon, spacing)) in self.polygons.iter().zip(&spacings).enumerate() {
            let result = self
                .generator
                .generate(polygon, spacing)
                .map_err(|e| e.for_polygon(index));
            let polygon_result = match result {
                Ok(polygon_result) => polygon_result,
                Err(err) => {
                    let message = err.to_string();
                    for listener in &self.listeners {
                        listener.on_error(&message);
                    }
                    return Err(err);
                }
            };
            for listener in &self.listeners {
                listener.on_plan_computed(index, spacing, &polygon_result.plan);
                listener.on_sequence_generated(index, &polygon_result.sequence);
            }
            planned.push(polygon_result);
        }

        let sequences: Vec<HoleSequence> = planned.iter().map(|p| p.sequence.clone()).collect();
        let layout = assembler.assemble(&sequences);
        for listener in &self.listeners {
            listener.on_layout_assembled(assembler.name(), &layout);
        }

        self.planned_polygons = Some(planned);
        Ok(&*self.layout_hole_sequence.insert(layout))
    }

    /// Feed the layout sequence to a writer in drilling order and finish it
    ///
    /// Coordinates are converted to the writer's length unit. Returns the
    /// number of holes written.
    pub fn write_numerical_control(&self, writer: &mut dyn NumericalControlWriter) -> Result<usize> {
        let sequence = self
            .layout_hole_sequence
            .as_ref()
            .ok_or(Error::InvalidState {
                prerequisite: "Generate hole sequence",
                method: "write_numerical_control",
            })?;

        let factor = unit_conversion_factor(self.length_unit, writer.length_unit());
        for hole in sequence.holes() {
            writer.add_hole(hole.x * factor, hole.y * factor);
        }
        if let Err(err) = writer.finish() {
            let message = err.to_string();
            for listener in &self.listeners {
                listener.on_error(&message);
            }
            return Err(err);
        }

        let num_holes = sequence.num_holes();
        let description = writer.describe();
        for listener in &self.listeners {
            listener.on_program_written(num_holes, &description);
        }
        Ok(num_holes)
    }
}
