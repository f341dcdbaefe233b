//! Pipeline listeners
//!
//! The layout pipeline reports its progress through [`SequenceListener`]
//! checkpoints. [`TracingListener`] forwards them to `tracing`; [`RunLog`]
//! keeps a human-readable record that can be saved next to the program.

use crate::planner::HoleSequencePlan;
use crate::sequence::HoleSequence;
use chrono::{Local, NaiveDate};
use memslaser_core::{PolygonSpacing, Transformation};
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Listener trait for pipeline checkpoints
///
/// All methods default to no-ops; implement the ones of interest.
pub trait SequenceListener: Send + Sync {
    /// Called after alignment transformations have been applied
    fn on_layout_aligned(&self, _transformations: &[Transformation], _description: &[String]) {}

    /// Called when a polygon's plan is known
    fn on_plan_computed(
        &self,
        _polygon_index: usize,
        _spacing: &PolygonSpacing,
        _plan: &HoleSequencePlan,
    ) {
    }

    /// Called when a polygon's hole sequence is generated
    fn on_sequence_generated(&self, _polygon_index: usize, _sequence: &HoleSequence) {}

    /// Called when the layout-wide sequence is assembled
    fn on_layout_assembled(&self, _assembler: &str, _sequence: &HoleSequence) {}

    /// Called after the program has been written
    fn on_program_written(&self, _num_holes: usize, _description: &[String]) {}

    /// Called when a pipeline step fails
    fn on_error(&self, _message: &str) {}
}

/// Forwards checkpoints to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl SequenceListener for TracingListener {
    fn on_layout_aligned(&self, transformations: &[Transformation], _description: &[String]) {
        for transformation in transformations {
            info!(%transformation, "Applied alignment transformation");
        }
    }

    fn on_plan_computed(
        &self,
        polygon_index: usize,
        _spacing: &PolygonSpacing,
        plan: &HoleSequencePlan,
    ) {
        info!(
            polygon = polygon_index + 1,
            passes = plan.num_passes(),
            initial_holes = plan.initial_num_holes,
            total_holes = plan.total_num_holes,
            initial_spacing = plan.initial_spacing,
            final_spacing = plan.final_spacing,
            "Planned polygon hole sequence"
        );
    }

    fn on_sequence_generated(&self, polygon_index: usize, sequence: &HoleSequence) {
        let holes_per_pass: Vec<usize> = sequence.passes().iter().map(Vec::len).collect();
        debug!(
            polygon = polygon_index + 1,
            holes = sequence.num_holes(),
            ?holes_per_pass,
            "Generated polygon hole sequence"
        );
    }

    fn on_layout_assembled(&self, assembler: &str, sequence: &HoleSequence) {
        info!(
            assembler,
            passes = sequence.num_passes(),
            holes = sequence.num_holes(),
            "Assembled layout hole sequence"
        );
    }

    fn on_program_written(&self, num_holes: usize, _description: &[String]) {
        info!(num_holes, "Numerical control program written");
    }

    fn on_error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Human-readable record of a run
#[derive(Debug, Default)]
pub struct RunLog {
    lines: Mutex<Vec<String>>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: impl Into<String>) {
        self.lines.lock().push(line.into());
    }

    fn extend<I: IntoIterator<Item = String>>(&self, lines: I) {
        self.lines.lock().extend(lines);
    }

    /// Recorded lines joined by newlines
    pub fn text(&self) -> String {
        self.lines.lock().join("\n")
    }

    /// Write the log to `<stem>_<dd-mm-YYYY>.<ext>` next to `path`
    ///
    /// The first line of the file is the date. Returns the dated path.
    pub fn write_dated(&self, path: impl AsRef<Path>) -> io::Result<PathBuf> {
        let date = Local::now().date_naive();
        let dated = dated_path(path.as_ref(), date);
        fs::write(&dated, format!("Date: {}\n{}", format_date(date), self.text()))?;
        Ok(dated)
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Insert the date between file stem and extension
pub fn dated_path(path: &Path, date: NaiveDate) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}_{}", stem, format_date(date));
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

fn indented(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines().map(|line| format!("    {}", line))
}

impl SequenceListener for RunLog {
    fn on_layout_aligned(&self, _transformations: &[Transformation], description: &[String]) {
        self.push("***Alignment***");
        self.extend(description.iter().flat_map(|line| indented(line)));
    }

    fn on_plan_computed(
        &self,
        polygon_index: usize,
        spacing: &PolygonSpacing,
        plan: &HoleSequencePlan,
    ) {
        let target_initial = spacing
            .target_initial
            .map_or_else(|| "optimized".to_string(), |value| value.to_string());
        self.push(format!("***Polygon {}***", polygon_index + 1));
        self.push(format!("    Target initial hole spacing: {}", target_initial));
        self.push(format!("    Target final hole spacing: {}", spacing.target_final));
        self.extend(indented(&plan.to_string()));
    }

    fn on_layout_assembled(&self, assembler: &str, sequence: &HoleSequence) {
        self.push("***Layout***");
        self.push(format!("    Assembly: {}", assembler));
        self.push(format!("    Number of passes: {}", sequence.num_passes()));
        self.push(format!("    Total number of holes: {}", sequence.num_holes()));
    }

    fn on_program_written(&self, _num_holes: usize, description: &[String]) {
        self.push("***Output***");
        self.extend(description.iter().flat_map(|line| indented(line)));
    }

    fn on_error(&self, message: &str) {
        self.push(format!("Error: {}", message));
    }
}
