use super::models::*;
use super::sqlite::Database;
use crate::report::model::FileRecord;
use rusqlite::{params, Result};
use serde_json::json;
use tracing::warn;

impl Database {
    // ── Sessions ─────────────────────────────────────────────────

    /// All sessions that processed at least one file, oldest first.
    /// The ascending start-time order is load-bearing: timeline deltas
    /// are computed against the previous element of this exact sequence.
    pub fn sessions_with_files(&self) -> Result<Vec<OrganizationSession>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, started_at, completed_at, dry_run, source_directories, \
                    base_path, file_limit, total_files, organized_count, \
                    skipped_count, error_count, total_cost, total_processing_time_sec \
             FROM organization_sessions \
             WHERE total_files > 0 \
             ORDER BY started_at ASC",
        )?;

        let sessions = stmt
            .query_map([], |row| {
                let raw_dirs: Option<String> = row.get(4)?;
                Ok(OrganizationSession {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    completed_at: row.get(2)?,
                    dry_run: row.get(3)?,
                    source_directories: parse_source_directories(raw_dirs),
                    base_path: row.get(5)?,
                    file_limit: row.get(6)?,
                    total_files: row.get(7)?,
                    organized_count: row.get(8)?,
                    skipped_count: row.get(9)?,
                    error_count: row.get(10)?,
                    total_cost: row.get(11)?,
                    total_processing_time_sec: row.get(12)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(sessions)
    }

    // ── Per-session breakdowns ───────────────────────────────────

    /// Category breakdown for one session: count and average assignment
    /// confidence per category, highest count first, top 10.
    pub fn session_categories(&self, session_id: &str) -> Result<Vec<CategoryCount>> {
        let mut stmt = self.connection().prepare(
            "SELECT c.name, c.color, c.icon, COUNT(fc.file_id) as count, \
                    AVG(fc.confidence) as avg_confidence \
             FROM categories c \
             JOIN file_categories fc ON c.id = fc.category_id \
             JOIN files f ON fc.file_id = f.id \
             WHERE f.session_id = ?1 \
             GROUP BY c.id \
             ORDER BY count DESC \
             LIMIT 10",
        )?;
        let categories = stmt
            .query_map(params![session_id], |row| {
                Ok(CategoryCount {
                    name: row.get(0)?,
                    color: row.get(1)?,
                    icon: row.get(2)?,
                    count: row.get(3)?,
                    avg_confidence: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(categories)
    }

    /// Schema-type distribution for one session, highest count first.
    /// Uncapped; rows without a recorded type are excluded.
    pub fn session_schema_types(&self, session_id: &str) -> Result<Vec<SchemaTypeCount>> {
        let mut stmt = self.connection().prepare(
            "SELECT schema_type, COUNT(*) as count \
             FROM files \
             WHERE session_id = ?1 AND schema_type IS NOT NULL \
             GROUP BY schema_type \
             ORDER BY count DESC",
        )?;
        let schema_types = stmt
            .query_map(params![session_id], |row| {
                Ok(SchemaTypeCount {
                    schema_type: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(schema_types)
    }

    /// File-extension distribution for one session, lowercased, highest
    /// count first, top 10.
    pub fn session_extensions(&self, session_id: &str) -> Result<Vec<ExtensionCount>> {
        let mut stmt = self.connection().prepare(
            "SELECT LOWER(file_extension) as extension, COUNT(*) as count \
             FROM files \
             WHERE session_id = ?1 AND file_extension IS NOT NULL \
             GROUP BY LOWER(file_extension) \
             ORDER BY count DESC \
             LIMIT 10",
        )?;
        let extensions = stmt
            .query_map(params![session_id], |row| {
                Ok(ExtensionCount {
                    extension: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(extensions)
    }

    // ── Cumulative stats ─────────────────────────────────────────

    /// Totals across all history, in one pass over the files table.
    pub fn cumulative_stats(&self) -> Result<CumulativeStats> {
        let (total_sessions, total_files, total_organized, avg_processing_time) =
            self.connection().query_row(
                "SELECT COUNT(DISTINCT session_id), COUNT(*), \
                        SUM(CASE WHEN status = 'organized' THEN 1 ELSE 0 END), \
                        AVG(processing_time_sec) \
                 FROM files \
                 WHERE session_id IS NOT NULL",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                        row.get::<_, Option<f64>>(3)?,
                    ))
                },
            )?;

        let mut stmt = self.connection().prepare(
            "SELECT c.name, COUNT(fc.file_id) as count \
             FROM categories c \
             LEFT JOIN file_categories fc ON c.id = fc.category_id \
             GROUP BY c.id \
             ORDER BY count DESC \
             LIMIT 5",
        )?;
        let top_categories = stmt
            .query_map([], |row| {
                Ok(CategoryTotal {
                    name: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(CumulativeStats {
            total_sessions,
            total_files,
            total_organized: total_organized.unwrap_or(0),
            avg_processing_time,
            top_categories,
        })
    }

    // ── Labeled records ──────────────────────────────────────────

    /// Labeled file records from every session except the automated run,
    /// shaped as report records ready for merging.
    pub fn labeled_records(&self, exclude_session: &str) -> Result<Vec<FileRecord>> {
        let mut stmt = self.connection().prepare(
            "SELECT f.original_path, f.filename, f.schema_type, \
                    f.extracted_text_length, c.name as subcategory, \
                    c.full_path, f.session_id \
             FROM files f \
             JOIN file_categories fc ON f.id = fc.file_id \
             JOIN categories c ON fc.category_id = c.id \
             WHERE f.session_id <> ?1",
        )?;

        let records = stmt
            .query_map(params![exclude_session], |row| {
                Ok(labeled_record(
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }
}

/// One corrupt JSON column must not block the rest of the aggregation.
fn parse_source_directories(raw: Option<String>) -> Vec<String> {
    match raw {
        Some(text) if !text.is_empty() => match serde_json::from_str(&text) {
            Ok(dirs) => dirs,
            Err(e) => {
                warn!("Ignoring malformed source_directories column: {}", e);
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

/// Shape a stored labeled row as a report record. The parent category is
/// the first segment of the category's slash-delimited full path, falling
/// back to the leaf name; labeled files are assumed to already sit at
/// their final location, so destination mirrors source.
fn labeled_record(
    original_path: String,
    filename: String,
    schema_type: Option<String>,
    extracted_text_length: Option<i64>,
    subcategory: String,
    full_path: Option<String>,
    session_id: Option<String>,
) -> FileRecord {
    let category = full_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .and_then(|p| p.split('/').next())
        .unwrap_or(&subcategory)
        .to_string();

    let schema_type = schema_type
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "DigitalDocument".to_string());

    FileRecord {
        source: original_path.clone(),
        status: Some("organized".to_string()),
        reason: None,
        destination: Some(original_path.clone()),
        schema: json!({
            "@context": "https://schema.org",
            "@type": schema_type,
            "name": filename.clone(),
            "description": filename,
            "filePath": original_path,
        }),
        extracted_text_length: extracted_text_length.unwrap_or(0),
        company_name: None,
        people_names: Vec::new(),
        image_metadata: json!({}),
        category: Some(category),
        subcategory: Some(subcategory),
        is_valid: Some(true),
        label_source: Some("manual_labeling".to_string()),
        session_id,
        extra: Default::default(),
    }
}
