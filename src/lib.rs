//! # memslaser
//!
//! Plans the order in which a pulsed laser drills holes along the outlines
//! of a MEMS layout, and writes it as an AeroBasic program.
//!
//! Cutting a membrane outline in one pass stresses the membrane. Holes are
//! drilled in passes instead: a coarse initial pass, then halving passes that
//! fill in the gaps until the final hole spacing is reached.
//!
//! ## Architecture
//!
//! memslaser is organized as a workspace with multiple crates:
//!
//! 1. **memslaser-core** - Geometry, transformations, units, spacing, errors
//! 2. **memslaser-camtools** - Planning, placement, scheduling, assembly, alignment, AeroBasic output
//! 3. **memslaser-settings** - Job configuration files
//! 4. **memslaser** - Main binary that runs a job

mod types;

use anyhow::Context;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub use memslaser_camtools::{
    AeroBasicWriter, HoleSequence, HoleSequencePlan, LayoutFile, LayoutPipeline, RunLog,
    TracingListener,
};
pub use memslaser_core::{Error, Result};
pub use memslaser_settings::JobConfig;
pub use types::JobSummary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

/// Run a job: read, transform, align, sequence and write the layout
pub fn run_job(config: &JobConfig) -> anyhow::Result<JobSummary> {
    let layout = LayoutFile::load(&config.layout)
        .with_context(|| format!("Failed to read layout {}", config.layout.display()))?;
    let mut pipeline = LayoutPipeline::from_reader(&layout)?.with_planner(config.pass_planner());

    let run_log = Arc::new(RunLog::new());
    pipeline.add_listener(Arc::new(TracingListener));
    if config.run_log.is_some() {
        pipeline.add_listener(run_log.clone());
    }

    for transformation in &config.transformations {
        pipeline.transform(transformation);
    }
    if let Some(aligner) = config.aligner()? {
        pipeline.align(&aligner);
    }
    pipeline.set_hole_spacing(&config.spacing)?;

    let assembler = config.assembly.assembler();
    let num_passes = pipeline
        .generate_hole_sequence(assembler.as_ref())?
        .num_passes();

    ensure_parent_dir(&config.output.path)?;
    let mut writer = AeroBasicWriter::new(&config.output.path, config.output.aerobasic.clone());
    let num_holes = pipeline.write_numerical_control(&mut writer)?;

    let run_log_path = match &config.run_log {
        Some(path) => Some({
            ensure_parent_dir(path)?;
            run_log
                .write_dated(path)
                .with_context(|| format!("Failed to write run log {}", path.display()))?
        }),
        None => None,
    };

    Ok(JobSummary {
        num_polygons: pipeline.num_polygons(),
        num_passes,
        num_holes,
        program_path: config.output.path.clone(),
        run_log_path,
    })
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}
