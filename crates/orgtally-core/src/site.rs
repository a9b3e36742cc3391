use crate::report::model::Report;
use crate::timeline::round1;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// One row of the site's metadata viewer, extracted 1:1 from a report
/// record.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataItem {
    pub source: String,
    pub destination: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub schema: Value,
    pub extracted_text_length: i64,
    pub company_name: Option<String>,
    pub image_metadata: Value,
}

/// Headline numbers for the landing page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SiteStats {
    pub total_files: usize,
    pub organized: usize,
    pub already_organized: usize,
    pub success_rate: f64,
    pub category_count: usize,
    pub top_categories: Vec<(String, usize)>,
}

pub fn extract_metadata(report: &Report) -> Vec<MetadataItem> {
    report
        .results
        .iter()
        .map(|r| MetadataItem {
            source: r.source.clone(),
            destination: r.destination.clone(),
            status: r.status.clone(),
            category: r.category.clone(),
            subcategory: r.subcategory.clone(),
            schema: object_or_default(&r.schema),
            extracted_text_length: r.extracted_text_length,
            company_name: r.company_name.clone(),
            image_metadata: object_or_default(&r.image_metadata),
        })
        .collect()
}

/// Success counts files organized this run plus files already found in
/// place; top categories are capped at five for the landing page.
pub fn calculate_stats(metadata: &[MetadataItem]) -> SiteStats {
    let total = metadata.len();
    let organized = count_status(metadata, "organized");
    let already_organized = count_status(metadata, "already_organized");

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in metadata {
        if let Some(category) = item.category.as_deref().filter(|c| !c.is_empty()) {
            *counts.entry(category).or_insert(0) += 1;
        }
    }
    let category_count = counts.len();

    let mut top_categories: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    top_categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_categories.truncate(5);

    let success_rate = if total > 0 {
        round1((organized + already_organized) as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    SiteStats {
        total_files: total,
        organized,
        already_organized,
        success_rate,
        category_count,
        top_categories,
    }
}

fn count_status(metadata: &[MetadataItem], status: &str) -> usize {
    metadata
        .iter()
        .filter(|m| m.status.as_deref() == Some(status))
        .count()
}

fn object_or_default(value: &Value) -> Value {
    if value.is_null() {
        Value::Object(Default::default())
    } else {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::Report;
    use serde_json::json;

    fn report_from(records: Vec<Value>) -> Report {
        serde_json::from_value(json!({ "results": records })).unwrap()
    }

    #[test]
    fn test_extract_metadata_defaults_missing_objects() {
        let report = report_from(vec![json!({ "source": "/a/1.pdf" })]);
        let metadata = extract_metadata(&report);
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata[0].source, "/a/1.pdf");
        assert!(metadata[0].schema.is_object());
        assert!(metadata[0].image_metadata.is_object());
        assert_eq!(metadata[0].extracted_text_length, 0);
    }

    #[test]
    fn test_stats_count_both_success_statuses() {
        let report = report_from(vec![
            json!({ "source": "/a/1.pdf", "status": "organized", "category": "Legal" }),
            json!({ "source": "/a/2.pdf", "status": "already_organized", "category": "Legal" }),
            json!({ "source": "/a/3.pdf", "status": "skipped", "category": "Media" }),
            json!({ "source": "/a/4.pdf", "status": "error" }),
        ]);
        let stats = calculate_stats(&extract_metadata(&report));
        assert_eq!(stats.total_files, 4);
        assert_eq!(stats.organized, 1);
        assert_eq!(stats.already_organized, 1);
        assert_eq!(stats.success_rate, 50.0);
        assert_eq!(stats.category_count, 2);
        assert_eq!(stats.top_categories[0], ("Legal".to_string(), 2));
    }

    #[test]
    fn test_stats_top_categories_capped_at_five() {
        let records = (0..8)
            .flat_map(|i| {
                let category = format!("Cat{}", i);
                (0..=i).map(move |j| {
                    json!({
                        "source": format!("/x/{}-{}.pdf", category, j),
                        "status": "organized",
                        "category": category.as_str(),
                    })
                })
            })
            .collect();
        let stats = calculate_stats(&extract_metadata(&report_from(records)));
        assert_eq!(stats.category_count, 8);
        assert_eq!(stats.top_categories.len(), 5);
        assert_eq!(stats.top_categories[0], ("Cat7".to_string(), 8));
    }

    #[test]
    fn test_stats_on_empty_report() {
        let stats = calculate_stats(&[]);
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert!(stats.top_categories.is_empty());
    }
}
