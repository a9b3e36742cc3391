use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// One file's classification outcome as it appears in a report.
///
/// Fields this tool never interprets (the schema payload, image
/// metadata, anything a newer pipeline version adds) ride along as
/// opaque JSON so a merge round-trip loses nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub schema: Value,
    #[serde(default)]
    pub extracted_text_length: i64,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub people_names: Vec<String>,
    #[serde(default)]
    pub image_metadata: Value,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub is_valid: Option<bool>,
    /// Absent for automated records, `manual_labeling` for records
    /// sourced from labeling sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileRecord {
    /// Basename of the source path, the secondary identity used for
    /// duplicate detection. Empty when the source is empty.
    pub fn filename(&self) -> String {
        if self.source.is_empty() {
            return String::new();
        }
        Path::new(&self.source)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// An organization report: the ordered record sequence plus totals and,
/// after a merge, provenance fields. A document missing the `results`
/// key deserializes to an empty sequence rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub results: Vec<FileRecord>,
    #[serde(default)]
    pub total_files: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labeling_records_added: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
