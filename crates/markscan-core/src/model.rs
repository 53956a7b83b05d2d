//! Core data model types for markscan.
//!
//! A [`Rubric`] declares the artifacts (source files) to inspect and the
//! [`Task`]s to grade against them. Everything here is immutable once built.

use serde::{Deserialize, Serialize};

use crate::error::RubricError;
use crate::predicate::Predicate;
use crate::timing::SubmissionPolicy;

/// One named source file a rubric grades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Identifier used by tasks and checks (e.g. "app").
    pub id: String,
    /// Display name used in feedback (e.g. "App.jsx").
    pub name: String,
    /// Accepted basenames, in order of preference.
    pub candidates: Vec<String>,
    /// Directories (relative to the project root) searched before a full walk.
    #[serde(default)]
    pub search_dirs: Vec<String>,
}

/// One required construct, tested against one artifact's cleaned text.
#[derive(Debug, Clone)]
pub struct Check {
    /// Human-readable description shown in the checklist.
    pub label: String,
    /// Id of the artifact whose cleaned text the predicate reads.
    pub artifact: String,
    pub predicate: Predicate,
}

impl Check {
    pub fn new(label: impl Into<String>, artifact: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            label: label.into(),
            artifact: artifact.into(),
            predicate,
        }
    }
}

/// One gradable unit with fixed marks and an ordered checklist.
#[derive(Debug, Clone)]
pub struct Task {
    id: String,
    name: String,
    marks: f64,
    files: Vec<String>,
    checks: Vec<Check>,
}

impl Task {
    /// Build a task, rejecting configurations that cannot be scored.
    ///
    /// Every check must read one of `files`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        marks: f64,
        files: Vec<String>,
        checks: Vec<Check>,
    ) -> Result<Self, RubricError> {
        let id = id.into();
        if !marks.is_finite() || marks <= 0.0 {
            return Err(RubricError::InvalidMarks { task: id, marks });
        }
        if checks.is_empty() {
            return Err(RubricError::EmptyTask(id));
        }
        if let Some(check) = checks.iter().find(|c| !files.contains(&c.artifact)) {
            return Err(RubricError::ArtifactNotRequired {
                task: id,
                label: check.label.clone(),
                artifact: check.artifact.clone(),
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            marks,
            files,
            checks,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marks(&self) -> f64 {
        self.marks
    }

    /// Artifacts that must all be present for the task to be evaluated.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }
}

/// How the project root is recognised and which directories a file search skips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectLayout {
    /// Sub-folder name to prefer when the grader runs from a repo root.
    #[serde(default)]
    pub preferred_dir: Option<String>,
    /// Paths that must exist for a directory to count as the project root.
    /// Entries ending in `/` must be directories.
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,
    /// Directory names never descended into.
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,
}

fn default_markers() -> Vec<String> {
    vec!["package.json".into(), "src/".into()]
}

fn default_ignore_dirs() -> Vec<String> {
    ["node_modules", ".git", "artifacts", "dist", "build", ".next", ".cache"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            preferred_dir: None,
            markers: default_markers(),
            ignore_dirs: default_ignore_dirs(),
        }
    }
}

/// A complete, validated grading rubric.
#[derive(Debug, Clone)]
pub struct Rubric {
    pub id: String,
    pub name: String,
    pub description: String,
    pub artifacts: Vec<Artifact>,
    pub tasks: Vec<Task>,
    pub submission: SubmissionPolicy,
    pub project: ProjectLayout,
}

impl Rubric {
    pub fn artifact(&self, id: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id == id)
    }

    /// Sum of all task marks.
    pub fn tasks_max(&self) -> f64 {
        self.tasks.iter().map(Task::marks).sum()
    }

    /// Tasks plus on-time submission marks.
    pub fn total_max(&self) -> f64 {
        self.tasks_max() + self.submission.full_marks()
    }

    pub fn check_count(&self) -> usize {
        self.tasks.iter().map(|t| t.checks().len()).sum()
    }
}
