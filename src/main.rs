use anyhow::{bail, Context};
use memslaser::{init_logging, run_job, JobConfig, BUILD_DATE, VERSION};
use std::path::PathBuf;

const USAGE: &str = "Usage: memslaser <job.toml | job.json>";

fn main() -> anyhow::Result<()> {
    let Some(arg) = std::env::args_os().nth(1) else {
        bail!(USAGE);
    };
    if arg == "--version" || arg == "-V" {
        println!("memslaser {} (built {})", VERSION, BUILD_DATE);
        return Ok(());
    }
    if arg == "--help" || arg == "-h" {
        println!("{}", USAGE);
        return Ok(());
    }

    // Initialize logging
    init_logging()?;

    let path = PathBuf::from(arg);
    let config = JobConfig::load_from_file(&path)
        .with_context(|| format!("Failed to load job {}", path.display()))?;
    let summary = run_job(&config)?;
    println!("{}", summary);

    Ok(())
}
