use std::fmt;
use std::path::PathBuf;

/// Outcome of a completed job
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub num_polygons: usize,
    /// Passes of the assembled layout sequence
    pub num_passes: usize,
    pub num_holes: usize,
    pub program_path: PathBuf,
    /// Dated run log, when one was requested
    pub run_log_path: Option<PathBuf>,
}

impl fmt::Display for JobSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Polygons: {}", self.num_polygons)?;
        writeln!(f, "Layout passes: {}", self.num_passes)?;
        writeln!(f, "Holes: {}", self.num_holes)?;
        write!(f, "Program: {}", self.program_path.display())?;
        if let Some(path) = &self.run_log_path {
            write!(f, "\nRun log: {}", path.display())?;
        }
        Ok(())
    }
}
