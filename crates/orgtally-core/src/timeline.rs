use crate::error::Error;
use crate::storage::models::{
    CategoryCount, CumulativeStats, ExtensionCount, OrganizationSession, SchemaTypeCount,
};
use crate::storage::Database;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

/// What changed relative to the chronologically preceding session. The
/// first session has no predecessor; its deltas degenerate to the raw
/// totals and the remaining fields are omitted entirely.
#[derive(Debug, Clone, Serialize)]
pub struct SessionChanges {
    pub is_first: bool,
    pub files_delta: i64,
    pub organized_delta: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_delta: Option<f64>,
}

/// A session enriched with its breakdowns and delta, ready for the run
/// history view.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEntry {
    #[serde(flatten)]
    pub session: OrganizationSession,
    /// First 8 characters of the session id, for compact display.
    pub id_short: String,
    pub success_rate: f64,
    pub categories: Vec<CategoryCount>,
    pub schema_types: Vec<SchemaTypeCount>,
    pub extensions: Vec<ExtensionCount>,
    pub changes: SessionChanges,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineDocument {
    pub generated_at: String,
    pub cumulative: CumulativeStats,
    pub sessions: Vec<SessionEntry>,
    pub session_count: usize,
}

/// Build the full run-history timeline: sessions oldest first, each with
/// its breakdowns and the delta against the session immediately before
/// it. One breakdown fetch per session plus one cumulative pass; session
/// counts are small, so this is linear and cheap.
pub fn build_timeline(db: &Database) -> Result<TimelineDocument, Error> {
    let sessions = db.sessions_with_files()?;
    info!("Building timeline for {} sessions", sessions.len());

    let cumulative = db.cumulative_stats()?;

    let mut entries: Vec<SessionEntry> = Vec::with_capacity(sessions.len());
    for (i, session) in sessions.iter().enumerate() {
        let previous = if i > 0 { Some(&sessions[i - 1]) } else { None };
        entries.push(SessionEntry {
            id_short: short_id(&session.id),
            success_rate: success_rate(session.organized_count, session.total_files),
            categories: db.session_categories(&session.id)?,
            schema_types: db.session_schema_types(&session.id)?,
            extensions: db.session_extensions(&session.id)?,
            changes: session_changes(session, previous),
            session: session.clone(),
        });
    }

    Ok(TimelineDocument {
        generated_at: Utc::now().to_rfc3339(),
        cumulative,
        session_count: entries.len(),
        sessions: entries,
    })
}

/// Delta of a session against its chronological predecessor.
pub fn session_changes(
    current: &OrganizationSession,
    previous: Option<&OrganizationSession>,
) -> SessionChanges {
    let previous = match previous {
        Some(p) => p,
        None => {
            return SessionChanges {
                is_first: true,
                files_delta: current.total_files,
                organized_delta: current.organized_count,
                success_rate_delta: None,
                cost_delta: None,
                time_delta: None,
            };
        }
    };

    let current_rate = success_rate(current.organized_count, current.total_files);
    let previous_rate = success_rate(previous.organized_count, previous.total_files);

    SessionChanges {
        is_first: false,
        files_delta: current.total_files - previous.total_files,
        organized_delta: current.organized_count - previous.organized_count,
        success_rate_delta: Some(round1(current_rate - previous_rate)),
        cost_delta: Some(round4(current.total_cost - previous.total_cost)),
        time_delta: Some(round2(
            current.total_processing_time_sec.unwrap_or(0.0)
                - previous.total_processing_time_sec.unwrap_or(0.0),
        )),
    }
}

/// Percentage of files organized, one decimal place. Sessions with zero
/// files are filtered out by the store query; the guard keeps this total
/// anyway.
pub fn success_rate(organized_count: i64, total_files: i64) -> f64 {
    if total_files <= 0 {
        return 0.0;
    }
    round1(organized_count as f64 / total_files as f64 * 100.0)
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, total: i64, organized: i64, cost: f64, time: f64) -> OrganizationSession {
        OrganizationSession {
            id: id.to_string(),
            started_at: "2025-12-01T10:00:00".to_string(),
            completed_at: None,
            dry_run: false,
            source_directories: Vec::new(),
            base_path: None,
            file_limit: None,
            total_files: total,
            organized_count: organized,
            skipped_count: 0,
            error_count: 0,
            total_cost: cost,
            total_processing_time_sec: Some(time),
        }
    }

    #[test]
    fn test_success_rate_rounding() {
        assert_eq!(success_rate(1, 3), 33.3);
        assert_eq!(success_rate(8, 10), 80.0);
        assert_eq!(success_rate(0, 0), 0.0);
    }

    #[test]
    fn test_first_session_has_raw_totals_and_no_deltas() {
        let changes = session_changes(&session("a", 10, 8, 0.5, 12.0), None);
        assert!(changes.is_first);
        assert_eq!(changes.files_delta, 10);
        assert_eq!(changes.organized_delta, 8);
        assert!(changes.success_rate_delta.is_none());
        assert!(changes.cost_delta.is_none());
        assert!(changes.time_delta.is_none());
    }

    #[test]
    fn test_delta_against_previous_session() {
        let first = session("a", 10, 8, 0.5, 12.0);
        let second = session("b", 15, 12, 0.75, 20.5);
        let changes = session_changes(&second, Some(&first));
        assert!(!changes.is_first);
        assert_eq!(changes.files_delta, 5);
        assert_eq!(changes.organized_delta, 4);
        assert_eq!(changes.success_rate_delta, Some(0.0));
        assert_eq!(changes.cost_delta, Some(0.25));
        assert_eq!(changes.time_delta, Some(8.5));
    }

    #[test]
    fn test_negative_deltas() {
        let second = session("b", 15, 12, 0.75, 20.5);
        let third = session("c", 12, 9, 0.75, 18.0);
        let changes = session_changes(&third, Some(&second));
        assert_eq!(changes.files_delta, -3);
        assert_eq!(changes.organized_delta, -3);
        assert_eq!(changes.success_rate_delta, Some(-5.0));
        assert_eq!(changes.cost_delta, Some(0.0));
        assert_eq!(changes.time_delta, Some(-2.5));
    }

    #[test]
    fn test_missing_processing_time_counts_as_zero() {
        let mut first = session("a", 10, 8, 0.0, 0.0);
        first.total_processing_time_sec = None;
        let second = session("b", 10, 8, 0.0, 7.25);
        let changes = session_changes(&second, Some(&first));
        assert_eq!(changes.time_delta, Some(7.25));
    }

    #[test]
    fn test_first_session_serialization_omits_delta_fields() {
        let changes = session_changes(&session("a", 10, 8, 0.5, 12.0), None);
        let value = serde_json::to_value(&changes).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("files_delta"));
        assert!(!object.contains_key("success_rate_delta"));
        assert!(!object.contains_key("cost_delta"));
        assert!(!object.contains_key("time_delta"));
    }
}
