use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::config::ensure_parent_dir;
use crate::scoring::EvaluationResult;

/// An evaluation as handed to downstream consumers: the result plus where
/// the facts came from and when it was produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport<'a> {
    pub source: String,
    pub evaluated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: &'a EvaluationResult,
}

impl<'a> ScoreReport<'a> {
    pub fn new(source: impl Into<String>, result: &'a EvaluationResult) -> Self {
        Self {
            source: source.into(),
            evaluated_at: Utc::now(),
            result,
        }
    }
}

/// Pretty-printed JSON for a report
pub fn format_json(report: &ScoreReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Save a report as JSON atomically
///
/// Uses atomic-write-file so a reader never sees a half-written report.
pub fn save_report(path: &Path, report: &ScoreReport) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize report")?;

    file.commit().context("Failed to save report")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Facts;
    use crate::scoring::{evaluate, RuleCatalog};
    use std::env;

    #[test]
    fn test_report_json_flattens_result() {
        let result = evaluate(&RuleCatalog::default(), &Facts::new());
        let report = ScoreReport::new("page.json", &result);
        let json: serde_json::Value = serde_json::from_str(&format_json(&report).unwrap()).unwrap();

        assert_eq!(json["source"], "page.json");
        assert!(json["evaluatedAt"].is_string());
        assert_eq!(json["healthScore"], 0);
        assert_eq!(json["catalogVersion"], "1.0.0");
        assert!(json["categoryScores"]["common_seo"].is_object());
    }

    #[test]
    fn test_category_order_preserved_in_json() {
        let result = evaluate(&RuleCatalog::default(), &Facts::new());
        let report = ScoreReport::new("page.json", &result);
        let text = format_json(&report).unwrap();

        let positions: Vec<usize> = ["\"common_seo\"", "\"speed\"", "\"security\"", "\"mobile\"", "\"advanced\""]
            .iter()
            .map(|key| text.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_save_report() {
        let temp_path = env::temp_dir().join("seo_health_test_report").join("report.json");
        let _ = std::fs::remove_file(&temp_path);

        let result = evaluate(&RuleCatalog::default(), &Facts::new().with("security.https", true));
        save_report(&temp_path, &ScoreReport::new("facts.json", &result)).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&temp_path).unwrap()).unwrap();
        assert_eq!(saved["source"], "facts.json");
        assert_eq!(saved["summary"]["passed"], 1);

        let _ = std::fs::remove_file(&temp_path);
    }
}
