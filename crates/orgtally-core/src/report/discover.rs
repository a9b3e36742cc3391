use crate::error::Error;
use glob::glob;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Report filename patterns in preference order: labeled reports carry
/// manual corrections, merged reports fold in labeling sessions, plain
/// reports are the raw automated output.
const REPORT_PATTERNS: &[&str] = &[
    "content_organization_report_labeled_*.json",
    "content_organization_report_merged_*.json",
    "content_organization_report_*.json",
];

/// Find the most recent report under `results_dir`, evaluating each
/// pattern in order and stopping at the first that matches anything.
pub fn find_latest_report(results_dir: &Path) -> Result<PathBuf, Error> {
    for pattern in REPORT_PATTERNS {
        let full_pattern = results_dir.join(pattern);
        let mut newest: Option<(SystemTime, PathBuf)> = None;

        for entry in glob(&full_pattern.to_string_lossy())? {
            let path = match entry {
                Ok(p) => p,
                Err(_) => continue,
            };
            let modified = path
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if newest.as_ref().map_or(true, |(t, _)| modified >= *t) {
                newest = Some((modified, path));
            }
        }

        if let Some((_, path)) = newest {
            debug!("Pattern '{}' matched {}", pattern, path.display());
            return Ok(path);
        }
    }

    Err(Error::ReportNotFound(results_dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_labeled_report_preferred_over_merged_and_plain() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("content_organization_report_20251201_1.json"), "{}").unwrap();
        fs::write(
            dir.path().join("content_organization_report_merged_20251202_1.json"),
            "{}",
        )
        .unwrap();
        fs::write(
            dir.path().join("content_organization_report_labeled_20251203_1.json"),
            "{}",
        )
        .unwrap();

        let found = find_latest_report(dir.path()).unwrap();
        assert_eq!(
            found.file_name().unwrap().to_str().unwrap(),
            "content_organization_report_labeled_20251203_1.json"
        );
    }

    #[test]
    fn test_plain_report_when_nothing_else_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("content_organization_report_20251201_1.json"), "{}").unwrap();
        fs::write(dir.path().join("unrelated.json"), "{}").unwrap();

        let found = find_latest_report(dir.path()).unwrap();
        assert_eq!(
            found.file_name().unwrap().to_str().unwrap(),
            "content_organization_report_20251201_1.json"
        );
    }

    #[test]
    fn test_missing_report_is_an_explicit_error() {
        let dir = tempfile::tempdir().unwrap();
        match find_latest_report(dir.path()) {
            Err(Error::ReportNotFound(reported)) => assert_eq!(reported, dir.path()),
            other => panic!("expected ReportNotFound, got {:?}", other),
        }
    }
}
