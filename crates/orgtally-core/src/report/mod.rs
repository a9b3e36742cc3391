pub mod discover;
pub mod merge;
pub mod model;

use crate::error::Error;
use model::Report;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn load_report(path: &Path) -> Result<Report, Error> {
    let text = fs::read_to_string(path)?;
    let report: Report = serde_json::from_str(&text)?;
    info!(
        "Loaded report {} ({} records)",
        path.display(),
        report.results.len()
    );
    Ok(report)
}

pub fn save_report(path: &Path, report: &Report) -> Result<(), Error> {
    let text = serde_json::to_string_pretty(report)?;
    fs::write(path, text)?;
    info!("Saved report {}", path.display());
    Ok(())
}
