use super::model::{FileRecord, Report};
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Outcome tallies for one merge run. Every supplementary record lands
/// in exactly one of `added`, `skipped_duplicate_path`,
/// `skipped_duplicate_filename`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub original_count: usize,
    pub labeling_records: usize,
    pub added: usize,
    pub skipped_duplicate_path: usize,
    pub skipped_duplicate_filename: usize,
    /// Accepted records per `category/subcategory`.
    pub categories_added: BTreeMap<String, usize>,
}

/// Merge labeled records into a report, skipping anything already present.
///
/// A record is a duplicate when its source path already appears in the
/// report, or when another source with the same basename does (a file
/// that moved between runs must not be counted twice). The path check runs
/// first, so a record duplicate by both criteria tallies only under
/// `skipped_duplicate_path`. The identity sets are seeded from the base
/// report once, before the scan; accepted records extend them
/// immediately, so a later supplementary record colliding with one
/// accepted earlier in the same pass is rejected.
pub fn merge_labeling_data(report: &mut Report, labeling_data: Vec<FileRecord>) -> MergeStats {
    let mut existing_sources: HashSet<String> =
        report.results.iter().map(|r| r.source.clone()).collect();
    let mut existing_filenames: HashSet<String> = report
        .results
        .iter()
        .filter(|r| !r.source.is_empty())
        .map(|r| r.filename())
        .collect();

    let mut stats = MergeStats {
        original_count: report.results.len(),
        labeling_records: labeling_data.len(),
        ..Default::default()
    };

    for record in labeling_data {
        if existing_sources.contains(&record.source) {
            stats.skipped_duplicate_path += 1;
            continue;
        }

        let filename = record.filename();
        if existing_filenames.contains(&filename) {
            stats.skipped_duplicate_filename += 1;
            continue;
        }

        let category_key = format!(
            "{}/{}",
            record.category.as_deref().unwrap_or(""),
            record.subcategory.as_deref().unwrap_or("")
        );
        *stats.categories_added.entry(category_key).or_insert(0) += 1;

        existing_sources.insert(record.source.clone());
        existing_filenames.insert(filename);
        report.results.push(record);
        stats.added += 1;
    }

    report.total_files = report.results.len() as i64;
    report.merge_timestamp = Some(Utc::now().to_rfc3339());
    report.labeling_records_added = Some(stats.added as i64);

    debug!(
        "Merge: {} added, {} duplicate paths, {} duplicate filenames",
        stats.added, stats.skipped_duplicate_path, stats.skipped_duplicate_filename
    );
    stats
}
