//! Grading report types with JSON persistence.
//!
//! A [`GradingReport`] is assembled once per run and never mutated; the
//! reporting crate only reads it.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::round2;
use crate::model::Rubric;
use crate::results::TaskResult;
use crate::timing::SubmissionRecord;

/// A complete grading report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub rubric: RubricSummary,
    /// Which files were checked and where they were found.
    pub artifacts: Vec<ArtifactSummary>,
    /// Per-task results in rubric order.
    pub tasks: Vec<TaskResult>,
    pub submission: SubmissionRecord,
    /// Sum of task scores, rounded to two decimals.
    pub tasks_score: f64,
    pub tasks_max: f64,
    /// Task score plus submission score.
    pub total: f64,
    pub total_max: f64,
}

/// Summary of a rubric (without the compiled checks).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricSummary {
    pub id: String,
    pub name: String,
    pub task_count: usize,
    pub check_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Found,
    Unreadable,
    NotFound,
}

/// Where an artifact was found, plus scanner or read diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub id: String,
    pub name: String,
    pub status: ArtifactStatus,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Total of a run: rounded task sum plus the timing score.
///
/// The two dimensions never interact.
pub fn aggregate(tasks: &[TaskResult], submission: &SubmissionRecord) -> (f64, f64) {
    let tasks_score = round2(tasks.iter().map(|t| t.score).sum());
    let total = round2(tasks_score + submission.score);
    (tasks_score, total)
}

impl GradingReport {
    /// Collect per-task results and the submission record into a report.
    pub fn assemble(
        rubric: &Rubric,
        artifacts: Vec<ArtifactSummary>,
        tasks: Vec<TaskResult>,
        submission: SubmissionRecord,
    ) -> Self {
        let (tasks_score, total) = aggregate(&tasks, &submission);
        let tasks_max: f64 = tasks.iter().map(|t| t.max).sum();
        let total_max = tasks_max + submission.max;

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            rubric: RubricSummary {
                id: rubric.id.clone(),
                name: rubric.name.clone(),
                task_count: rubric.tasks.len(),
                check_count: rubric.check_count(),
            },
            artifacts,
            tasks,
            submission,
            tasks_score,
            tasks_max,
            total,
            total_max,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    pub fn submission_score(&self) -> f64 {
        self.submission.score
    }

    pub fn task(&self, id: &str) -> Option<&TaskResult> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Artifacts that were not found or could not be read.
    pub fn missing_artifacts(&self) -> impl Iterator<Item = &ArtifactSummary> {
        self.artifacts
            .iter()
            .filter(|a| a.status != ArtifactStatus::Found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::CheckOutcome;
    use chrono::DateTime;

    fn task(id: &str, max: f64, score: f64) -> TaskResult {
        TaskResult {
            id: id.into(),
            name: id.into(),
            max,
            score,
            checklist: vec![CheckOutcome {
                label: "x".into(),
                passed: score >= max,
            }],
            deductions: vec![],
        }
    }

    fn submission(score: f64) -> SubmissionRecord {
        let deadline = DateTime::parse_from_rfc3339("2026-02-25T20:59:00+03:00").unwrap();
        SubmissionRecord {
            submitted_at: None,
            raw: None,
            deadline,
            late: score < 20.0,
            score,
            max: 20.0,
        }
    }

    fn make_report(tasks: Vec<TaskResult>, sub: SubmissionRecord) -> GradingReport {
        let (tasks_score, total) = aggregate(&tasks, &sub);
        GradingReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            rubric: RubricSummary {
                id: "test".into(),
                name: "Test".into(),
                task_count: tasks.len(),
                check_count: tasks.len(),
            },
            artifacts: vec![ArtifactSummary {
                id: "app".into(),
                name: "App.jsx".into(),
                status: ArtifactStatus::NotFound,
                path: None,
                notes: vec![],
            }],
            tasks_max: tasks.iter().map(|t| t.max).sum(),
            total_max: tasks.iter().map(|t| t.max).sum::<f64>() + sub.max,
            tasks,
            submission: sub,
            tasks_score,
            total,
        }
    }

    #[test]
    fn aggregate_is_additive() {
        let tasks = vec![task("t1", 20.0, 13.33), task("t2", 20.0, 16.67), task("t3", 20.0, 0.0)];
        let (tasks_score, total) = aggregate(&tasks, &submission(10.0));
        assert_eq!(tasks_score, 30.0);
        assert_eq!(total, 40.0);
    }

    #[test]
    fn perfect_code_late_submission() {
        let tasks = vec![task("t1", 20.0, 20.0), task("t2", 20.0, 20.0)];
        let (tasks_score, total) = aggregate(&tasks, &submission(10.0));
        assert_eq!(tasks_score, 40.0);
        assert_eq!(total, 50.0);
    }

    #[test]
    fn rounding_noise_is_removed() {
        let tasks = vec![task("t1", 20.0, 13.33), task("t2", 20.0, 13.33), task("t3", 20.0, 13.33)];
        let (tasks_score, total) = aggregate(&tasks, &submission(20.0));
        assert_eq!(tasks_score, 39.99);
        assert_eq!(total, 59.99);
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report(vec![task("t1", 20.0, 20.0)], submission(20.0));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = GradingReport::load_json(&path).unwrap();

        assert_eq!(loaded.rubric.id, "test");
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.total, 40.0);
        assert_eq!(loaded.artifacts[0].status, ArtifactStatus::NotFound);
    }

    #[test]
    fn serialized_status_is_snake_case() {
        let report = make_report(vec![], submission(10.0));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"not_found\""));
    }

    #[test]
    fn lookup_helpers() {
        let report = make_report(vec![task("t1", 20.0, 20.0)], submission(20.0));
        assert!(report.task("t1").is_some());
        assert!(report.task("t9").is_none());
        assert_eq!(report.missing_artifacts().count(), 1);
        assert_eq!(report.submission_score(), 20.0);
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(GradingReport::load_json(Path::new("no_such_report.json")).is_err());
    }
}
