//! Rule engine and grading orchestrator.
//!
//! Each artifact is scanned once, each task is evaluated once against the
//! cleaned texts, and the results are collected into a [`GradingReport`].
//! Every step returns a value; nothing is accumulated in shared state.

use std::path::PathBuf;

use crate::model::{Rubric, Task};
use crate::report::{ArtifactStatus, ArtifactSummary, GradingReport};
use crate::results::{CheckOutcome, TaskResult};
use crate::scanner::{self, Unterminated};
use crate::timing::SubmissionTime;
use crate::traits::{ArtifactContent, ArtifactSource};

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Proportional deduction: each of `total` checks is worth `marks / total`,
/// and every failed check loses its whole share.
pub fn proportional_score(marks: f64, failed: usize, total: usize) -> f64 {
    debug_assert!(total > 0, "tasks with no checks are rejected at load time");
    if failed == 0 || total == 0 {
        return marks;
    }
    if failed >= total {
        return 0.0;
    }
    let share = marks / total as f64;
    // Rounding can push a sub-cent remainder above `marks`.
    round2(marks - share * failed as f64).clamp(0.0, marks)
}

/// One artifact after scanning.
#[derive(Debug, Clone)]
pub struct CleanedSource {
    pub artifact_id: String,
    pub name: String,
    pub state: SourceState,
}

#[derive(Debug, Clone)]
pub enum SourceState {
    Ready {
        path: PathBuf,
        cleaned: String,
        unterminated: Option<Unterminated>,
    },
    Unreadable {
        path: PathBuf,
        reason: String,
    },
    NotFound,
}

/// Cleaned text for every artifact in a rubric, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CleanedSources {
    entries: Vec<CleanedSource>,
}

impl CleanedSources {
    /// Read and scan every artifact the rubric declares.
    pub fn load(rubric: &Rubric, source: &dyn ArtifactSource) -> Self {
        let entries = rubric
            .artifacts
            .iter()
            .map(|artifact| {
                let state = match source.read(artifact) {
                    ArtifactContent::Found { path, text } => {
                        let scan = scanner::scan(&text);
                        if let Some(open) = &scan.unterminated {
                            tracing::warn!("{}: {open}", path.display());
                        }
                        tracing::debug!(
                            artifact = %artifact.id,
                            path = %path.display(),
                            raw_len = text.len(),
                            cleaned_len = scan.cleaned.len(),
                            "scanned artifact"
                        );
                        SourceState::Ready {
                            path,
                            cleaned: scan.cleaned,
                            unterminated: scan.unterminated,
                        }
                    }
                    ArtifactContent::Unreadable { path, reason } => {
                        tracing::warn!("could not read {}: {reason}", path.display());
                        SourceState::Unreadable { path, reason }
                    }
                    ArtifactContent::NotFound => {
                        tracing::info!("{} not found", artifact.name);
                        SourceState::NotFound
                    }
                };
                CleanedSource {
                    artifact_id: artifact.id.clone(),
                    name: artifact.name.clone(),
                    state,
                }
            })
            .collect();
        Self { entries }
    }

    /// Build directly from already-cleaned texts, keyed by artifact id.
    pub fn from_cleaned<'a>(texts: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = texts
            .into_iter()
            .map(|(id, cleaned)| CleanedSource {
                artifact_id: id.to_string(),
                name: id.to_string(),
                state: SourceState::Ready {
                    path: PathBuf::from(id),
                    cleaned: cleaned.to_string(),
                    unterminated: None,
                },
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, artifact_id: &str) -> Option<&CleanedSource> {
        self.entries.iter().find(|e| e.artifact_id == artifact_id)
    }

    /// Cleaned text, if the artifact was found and read.
    pub fn text(&self, artifact_id: &str) -> Option<&str> {
        match self.get(artifact_id).map(|e| &e.state) {
            Some(SourceState::Ready { cleaned, .. }) => Some(cleaned.as_str()),
            _ => None,
        }
    }

    pub fn summaries(&self) -> Vec<ArtifactSummary> {
        self.entries
            .iter()
            .map(|e| {
                let (status, path, notes) = match &e.state {
                    SourceState::Ready {
                        path, unterminated, ..
                    } => (
                        ArtifactStatus::Found,
                        Some(path.display().to_string()),
                        unterminated.iter().map(|u| u.to_string()).collect(),
                    ),
                    SourceState::Unreadable { path, reason } => (
                        ArtifactStatus::Unreadable,
                        Some(path.display().to_string()),
                        vec![reason.clone()],
                    ),
                    SourceState::NotFound => (ArtifactStatus::NotFound, None, Vec::new()),
                };
                ArtifactSummary {
                    id: e.artifact_id.clone(),
                    name: e.name.clone(),
                    status,
                    path,
                    notes,
                }
            })
            .collect()
    }
}

/// Deduction reason for a task whose required files are absent.
fn missing_reason(task: &Task, sources: &CleanedSources, missing: &[&String]) -> String {
    if let [only] = missing {
        return match sources.get(only) {
            Some(CleanedSource {
                name,
                state: SourceState::Unreadable { path, .. },
                ..
            }) => format!("Could not read {name} at: {}", path.display()),
            Some(entry) => format!("{} not found.", entry.name),
            None => format!("{only} not found."),
        };
    }
    let names: Vec<&str> = missing
        .iter()
        .map(|id| sources.get(id).map_or(id.as_str(), |e| e.name.as_str()))
        .collect();
    tracing::debug!(task = task.id(), "missing {} files", names.len());
    format!("Missing key files: {}.", names.join(", "))
}

/// Evaluate one task against the cleaned sources.
///
/// If any required artifact is absent the task scores zero with a single
/// deduction and no checks run. Otherwise every check runs, in order.
pub fn evaluate_task(task: &Task, sources: &CleanedSources) -> TaskResult {
    let missing: Vec<&String> = task
        .files()
        .iter()
        .filter(|id| sources.text(id).is_none())
        .collect();

    if !missing.is_empty() {
        let reason = missing_reason(task, sources, &missing);
        tracing::info!(task = task.id(), "{reason}");
        return TaskResult {
            id: task.id().to_string(),
            name: task.name().to_string(),
            max: task.marks(),
            score: 0.0,
            checklist: Vec::new(),
            deductions: vec![reason],
        };
    }

    let checklist: Vec<CheckOutcome> = task
        .checks()
        .iter()
        .map(|check| {
            let text = sources.text(&check.artifact).unwrap_or_default();
            let passed = check.predicate.evaluate(text);
            tracing::debug!(task = task.id(), check = %check.label, passed);
            CheckOutcome {
                label: check.label.clone(),
                passed,
            }
        })
        .collect();

    let failed = checklist.iter().filter(|c| !c.passed).count();
    let score = proportional_score(task.marks(), failed, checklist.len());
    let deductions = checklist
        .iter()
        .filter(|c| !c.passed)
        .map(|c| format!("Missing: {}", c.label))
        .collect();

    TaskResult {
        id: task.id().to_string(),
        name: task.name().to_string(),
        max: task.marks(),
        score,
        checklist,
        deductions,
    }
}

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_artifact(&self, summary: &ArtifactSummary);
    fn on_task_complete(&self, result: &TaskResult);
    fn on_run_complete(&self, report: &GradingReport);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_artifact(&self, _: &ArtifactSummary) {}
    fn on_task_complete(&self, _: &TaskResult) {}
    fn on_run_complete(&self, _: &GradingReport) {}
}

/// Grades one submission against a rubric.
pub struct GradingEngine<'r> {
    rubric: &'r Rubric,
}

impl<'r> GradingEngine<'r> {
    pub fn new(rubric: &'r Rubric) -> Self {
        Self { rubric }
    }

    pub fn rubric(&self) -> &Rubric {
        self.rubric
    }

    /// Run a full grading pass. Always completes.
    pub fn run(
        &self,
        source: &dyn ArtifactSource,
        submitted: &SubmissionTime,
        progress: &dyn ProgressReporter,
    ) -> GradingReport {
        let sources = CleanedSources::load(self.rubric, source);
        let artifacts = sources.summaries();
        for summary in &artifacts {
            progress.on_artifact(summary);
        }

        let tasks: Vec<TaskResult> = self
            .rubric
            .tasks
            .iter()
            .map(|task| {
                let result = evaluate_task(task, &sources);
                tracing::info!(
                    task = %result.id,
                    score = result.score,
                    max = result.max,
                    "task graded"
                );
                progress.on_task_complete(&result);
                result
            })
            .collect();

        let submission = self.rubric.submission.assess(submitted);
        let report = GradingReport::assemble(self.rubric, artifacts, tasks, submission);
        progress.on_run_complete(&report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Artifact, Check, ProjectLayout};
    use crate::predicate::{any_pattern, matches};
    use crate::timing::SubmissionPolicy;
    use crate::traits::MemorySource;

    fn artifact(id: &str) -> Artifact {
        Artifact {
            id: id.into(),
            name: format!("{id}.jsx"),
            candidates: vec![format!("{id}.jsx")],
            search_dirs: vec![],
        }
    }

    fn task_with_patterns(marks: f64, patterns: &[&str]) -> Task {
        let checks = patterns
            .iter()
            .map(|p| Check::new(format!("has {p}"), "app", matches(p).unwrap()))
            .collect();
        Task::new("t1", "Task 1", marks, vec!["app".into()], checks).unwrap()
    }

    fn rubric(tasks: Vec<Task>, artifacts: Vec<Artifact>) -> Rubric {
        Rubric {
            id: "r".into(),
            name: "Rubric".into(),
            description: String::new(),
            artifacts,
            tasks,
            submission: SubmissionPolicy::parse("2026-02-25T20:59:00+03:00", 20.0, 10.0).unwrap(),
            project: ProjectLayout::default(),
        }
    }

    #[test]
    fn round2_half_away_from_zero() {
        assert_eq!(round2(13.333333), 13.33);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn six_checks_two_failing() {
        assert_eq!(proportional_score(20.0, 2, 6), 13.33);
    }

    #[test]
    fn no_failures_is_exact_marks() {
        assert_eq!(proportional_score(20.0, 0, 7), 20.0);
        assert_eq!(proportional_score(17.5, 0, 3), 17.5);
    }

    #[test]
    fn all_failing_is_zero() {
        assert_eq!(proportional_score(20.0, 3, 3), 0.0);
        assert_eq!(proportional_score(20.0, 7, 3), 0.0);
    }

    #[test]
    fn sub_cent_marks_never_round_above_max() {
        let score = proportional_score(0.009, 1, 10);
        assert!(score <= 0.009, "score {score} exceeds max");
        assert!(score >= 0.0);
    }

    #[test]
    fn score_is_monotonic_in_failures() {
        for total in 1..=9 {
            let mut previous = f64::INFINITY;
            for failed in 0..=total {
                let s = proportional_score(20.0, failed, total);
                assert!(s <= previous);
                assert!((0.0..=20.0).contains(&s));
                previous = s;
            }
        }
    }

    #[test]
    fn evaluates_every_check_in_order() {
        let task = task_with_patterns(20.0, &["alpha", "beta", "gamma"]);
        let sources = CleanedSources::from_cleaned([("app", "gamma then alpha")]);
        let result = evaluate_task(&task, &sources);

        let labels: Vec<_> = result.checklist.iter().map(|c| (c.label.as_str(), c.passed)).collect();
        assert_eq!(
            labels,
            vec![("has alpha", true), ("has beta", false), ("has gamma", true)]
        );
        assert_eq!(result.score, 13.33);
        assert_eq!(result.deductions, vec!["Missing: has beta"]);
    }

    #[test]
    fn full_marks_has_no_deductions() {
        let task = task_with_patterns(20.0, &["a"]);
        let sources = CleanedSources::from_cleaned([("app", "a")]);
        let result = evaluate_task(&task, &sources);
        assert_eq!(result.score, 20.0);
        assert!(result.deductions.is_empty());
        assert!(result.is_full_marks());
    }

    #[test]
    fn missing_file_fails_task_outright() {
        let r = rubric(vec![task_with_patterns(20.0, &["a", "b"])], vec![artifact("app")]);
        let sources = CleanedSources::load(&r, &MemorySource::new());
        let result = evaluate_task(&r.tasks[0], &sources);

        assert_eq!(result.score, 0.0);
        assert!(result.checklist.is_empty());
        assert_eq!(result.deductions, vec!["app.jsx not found."]);
        assert!(result.failed_outright());
    }

    #[test]
    fn unreadable_file_names_its_path() {
        let r = rubric(vec![task_with_patterns(20.0, &["a"])], vec![artifact("app")]);
        let source = MemorySource::new().with_unreadable("app", "permission denied");
        let sources = CleanedSources::load(&r, &source);
        let result = evaluate_task(&r.tasks[0], &sources);
        assert_eq!(result.deductions, vec!["Could not read app.jsx at: app"]);
    }

    #[test]
    fn several_missing_files_listed_together() {
        let task = Task::new(
            "t2",
            "Task 2",
            20.0,
            vec!["card".into(), "item".into(), "badge".into()],
            vec![Check::new("x", "card", matches("x").unwrap())],
        )
        .unwrap();
        let r = rubric(
            vec![task],
            vec![artifact("card"), artifact("item"), artifact("badge")],
        );
        let source = MemorySource::new().with_file("item", "ok");
        let sources = CleanedSources::load(&r, &source);
        let result = evaluate_task(&r.tasks[0], &sources);
        assert_eq!(
            result.deductions,
            vec!["Missing key files: card.jsx, badge.jsx."]
        );
    }

    #[test]
    fn commented_out_code_does_not_count() {
        let r = rubric(
            vec![task_with_patterns(10.0, &[r"foo\("])],
            vec![artifact("app")],
        );
        let source = MemorySource::new().with_file("app", "// TODO call foo()\n");
        let report = GradingEngine::new(&r).run(&source, &SubmissionTime::Unknown, &NoopReporter);
        assert_eq!(report.tasks[0].score, 0.0);
        assert_eq!(report.tasks[0].checklist.len(), 1);
        assert!(!report.tasks[0].checklist[0].passed);
    }

    #[test]
    fn checks_read_their_own_artifact() {
        let task = Task::new(
            "t3",
            "Task 3",
            20.0,
            vec!["card".into(), "item".into()],
            vec![
                Check::new("card uses &&", "card", any_pattern(&["&&"], true).unwrap()),
                Check::new("item renders badge", "item", matches("<DueBadge").unwrap()),
            ],
        )
        .unwrap();
        let sources = CleanedSources::from_cleaned([
            ("card", "<DueBadge />"),
            ("item", "{done && <p/>}"),
        ]);
        let result = evaluate_task(&task, &sources);
        assert!(result.checklist.iter().all(|c| !c.passed));
    }

    #[test]
    fn run_assembles_report_with_diagnostics() {
        let r = rubric(vec![task_with_patterns(20.0, &["ok"])], vec![artifact("app")]);
        let source = MemorySource::new().with_file("app", "ok /* never closed");
        let submitted = SubmissionTime::parse("2026-02-01T00:00:00Z");
        let report = GradingEngine::new(&r).run(&source, &submitted, &NoopReporter);

        assert_eq!(report.tasks_score, 20.0);
        assert_eq!(report.submission.score, 20.0);
        assert_eq!(report.total, 40.0);
        assert_eq!(report.total_max, 40.0);
        assert_eq!(report.artifacts[0].status, ArtifactStatus::Found);
        assert_eq!(report.artifacts[0].notes.len(), 1);
        assert!(report.artifacts[0].notes[0].contains("block comment"));
    }
}
