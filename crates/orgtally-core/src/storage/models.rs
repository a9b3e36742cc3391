use serde::Serialize;

/// One run of the upstream organization pipeline, as stored.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationSession {
    pub id: String,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub dry_run: bool,
    pub source_directories: Vec<String>,
    pub base_path: Option<String>,
    pub file_limit: Option<i64>,
    pub total_files: i64,
    pub organized_count: i64,
    pub skipped_count: i64,
    pub error_count: i64,
    pub total_cost: f64,
    pub total_processing_time_sec: Option<f64>,
}

/// Category distribution row for one session.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub count: i64,
    pub avg_confidence: Option<f64>,
}

/// Schema-type distribution row for one session.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaTypeCount {
    pub schema_type: String,
    pub count: i64,
}

/// File-extension distribution row for one session.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionCount {
    pub extension: String,
    pub count: i64,
}

/// Per-category file total across all history.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub count: i64,
}

/// Aggregate over every file row ever stored. Computed in a single pass
/// over the files table, not folded from per-session stats, so it counts
/// records even when their session linkage is inconsistent.
#[derive(Debug, Clone, Serialize)]
pub struct CumulativeStats {
    pub total_sessions: i64,
    pub total_files: i64,
    pub total_organized: i64,
    pub avg_processing_time: Option<f64>,
    pub top_categories: Vec<CategoryTotal>,
}
