//! # memslaser CAM Tools
//!
//! Hole sequence planning and machine program generation for laser
//! machining of MEMS membranes.
//!
//! ## Hole Sequencing
//!
//! - **Planner**: Number of passes, initial hole count and achieved spacings
//! - **Placement**: Equidistant holes along a closed polygon boundary
//! - **Scheduler**: Drilling order by per-segment recursive bisection
//! - **Polygon Sequence**: Planning, placement and scheduling of one polygon
//!
//! ## Layout Processing
//!
//! - **Pipeline**: Loads, aligns and sequences a layout, then writes the program
//! - **Assembly**: Sequential and interleaved layout hole sequences
//! - **Alignment**: Registration to a stage-mounted square membrane
//! - **Layout File**: JSON layout reader
//! - **AeroBasic**: Program writer for Aerotech stages
//! - **Listener**: Tracing and run-log checkpoints

pub mod aerobasic;
pub mod alignment;
pub mod assembly;
pub mod error;
pub mod interfaces;
pub mod layout_file;
pub mod listener;
pub mod pipeline;
pub mod placement;
pub mod planner;
pub mod polygon_sequence;
pub mod scheduler;
pub mod sequence;

pub use aerobasic::{AeroBasicParameters, AeroBasicWriter, AEROBASIC_LENGTH_UNIT};
pub use alignment::{MembraneCornerAligner, MembraneCornerMeasurement};
pub use assembly::{AssemblyStrategy, InterleavedAssembler, SequentialAssembler};
pub use error::{SequenceError, SequenceResult};
pub use interfaces::{HoleSequenceAssembler, LayoutAligner, LayoutReader, NumericalControlWriter};
pub use layout_file::{LayoutFile, LayoutUnit};
pub use listener::{RunLog, SequenceListener, TracingListener};
pub use pipeline::LayoutPipeline;
pub use placement::{place_holes, place_polygon_holes};
pub use planner::{plan_polygon_hole_sequence, HoleSequencePlan, PassPlanner};
pub use polygon_sequence::{PlannedPolygon, PolygonHoleSequenceGenerator};
pub use scheduler::{schedule_hole_indices, SegmentTemplate};
pub use sequence::HoleSequence;
