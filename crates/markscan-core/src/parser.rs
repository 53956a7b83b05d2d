//! TOML rubric parser.
//!
//! Loads rubrics from TOML files and directories, compiles every pattern up
//! front, and validates them. Configuration mistakes surface here, never
//! during grading.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::RubricError;
use crate::model::{Artifact, Check, ProjectLayout, Rubric, Task};
use crate::predicate::{all_of, any_pattern, not, Predicate};
use crate::timing::{SubmissionPolicy, DEFAULT_FULL_MARKS, DEFAULT_LATE_MARKS};

/// Intermediate TOML structure for parsing rubric files.
#[derive(Debug, Deserialize)]
struct TomlRubricFile {
    rubric: TomlRubricHeader,
    submission: TomlSubmission,
    #[serde(default)]
    project: ProjectLayout,
    #[serde(default)]
    artifacts: Vec<Artifact>,
    #[serde(default)]
    tasks: Vec<TomlTask>,
}

#[derive(Debug, Deserialize)]
struct TomlRubricHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_true")]
    case_insensitive: bool,
}

#[derive(Debug, Deserialize)]
struct TomlSubmission {
    deadline: String,
    #[serde(default = "default_full_marks")]
    full_marks: f64,
    #[serde(default = "default_late_marks")]
    late_marks: f64,
}

fn default_true() -> bool {
    true
}

fn default_full_marks() -> f64 {
    DEFAULT_FULL_MARKS
}

fn default_late_marks() -> f64 {
    DEFAULT_LATE_MARKS
}

#[derive(Debug, Deserialize)]
struct TomlTask {
    id: String,
    name: String,
    marks: f64,
    files: Vec<String>,
    #[serde(default)]
    checks: Vec<TomlCheck>,
}

#[derive(Debug, Deserialize)]
struct TomlCheck {
    label: String,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    any_of: Vec<String>,
    #[serde(default)]
    all_of: Vec<Vec<String>>,
    #[serde(default)]
    none_of: Vec<String>,
    #[serde(default)]
    case_insensitive: Option<bool>,
}

impl TomlCheck {
    /// `any_of` is one OR-group, each `all_of` entry is another, and all
    /// groups must hold. `none_of` patterns must all be absent.
    fn build_predicate(&self, task_id: &str, case_insensitive: bool) -> Result<Predicate, RubricError> {
        let mut groups: Vec<Predicate> = Vec::new();
        if !self.any_of.is_empty() {
            groups.push(any_pattern(&self.any_of, case_insensitive)?);
        }
        for group in self.all_of.iter().filter(|g| !g.is_empty()) {
            groups.push(any_pattern(group, case_insensitive)?);
        }
        if groups.is_empty() {
            return Err(RubricError::EmptyCheck {
                task: task_id.to_string(),
                label: self.label.clone(),
            });
        }
        if !self.none_of.is_empty() {
            groups.push(not(any_pattern(&self.none_of, case_insensitive)?));
        }
        if groups.len() == 1 {
            return Ok(groups.remove(0));
        }
        Ok(all_of(groups))
    }
}

/// Parse a single TOML file into a `Rubric`.
pub fn parse_rubric(path: &Path) -> Result<Rubric> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rubric file: {}", path.display()))?;

    parse_rubric_str(&content, path)
}

/// Parse a TOML string into a `Rubric` (useful for testing).
pub fn parse_rubric_str(content: &str, source_path: &Path) -> Result<Rubric> {
    let parsed: TomlRubricFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    build_rubric(parsed).with_context(|| format!("invalid rubric: {}", source_path.display()))
}

fn build_rubric(parsed: TomlRubricFile) -> Result<Rubric, RubricError> {
    let mut seen = HashSet::new();
    for artifact in &parsed.artifacts {
        if !seen.insert(artifact.id.as_str()) {
            return Err(RubricError::DuplicateArtifact(artifact.id.clone()));
        }
        if artifact.candidates.is_empty() {
            return Err(RubricError::NoCandidates(artifact.id.clone()));
        }
    }

    if parsed.tasks.is_empty() {
        return Err(RubricError::NoTasks);
    }

    let rubric_case = parsed.rubric.case_insensitive;
    let tasks = parsed
        .tasks
        .into_iter()
        .map(|t| {
            if let Some(unknown) = t.files.iter().find(|f| !seen.contains(f.as_str())) {
                return Err(RubricError::UnknownArtifact {
                    task: t.id.clone(),
                    artifact: unknown.clone(),
                });
            }

            let checks = t
                .checks
                .iter()
                .map(|c| {
                    let artifact = match &c.file {
                        Some(file) => file.clone(),
                        None => t.files.first().cloned().ok_or_else(|| {
                            RubricError::EmptyTask(t.id.clone())
                        })?,
                    };
                    if !seen.contains(artifact.as_str()) {
                        return Err(RubricError::UnknownArtifact {
                            task: t.id.clone(),
                            artifact,
                        });
                    }
                    let predicate =
                        c.build_predicate(&t.id, c.case_insensitive.unwrap_or(rubric_case))?;
                    Ok(Check::new(c.label.clone(), artifact, predicate))
                })
                .collect::<Result<Vec<_>, RubricError>>()?;

            Task::new(t.id, t.name, t.marks, t.files, checks)
        })
        .collect::<Result<Vec<_>, RubricError>>()?;

    let submission = SubmissionPolicy::parse(
        &parsed.submission.deadline,
        parsed.submission.full_marks,
        parsed.submission.late_marks,
    )?;

    Ok(Rubric {
        id: parsed.rubric.id,
        name: parsed.rubric.name,
        description: parsed.rubric.description,
        artifacts: parsed.artifacts,
        tasks,
        submission,
        project: parsed.project,
    })
}

/// Recursively load all `.toml` rubric files from a directory.
pub fn load_rubric_directory(dir: &Path) -> Result<Vec<Rubric>> {
    let mut rubrics = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            rubrics.extend(load_rubric_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_rubric(&path) {
                Ok(rubric) => rubrics.push(rubric),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(rubrics)
}

/// A warning from rubric validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The task ID (if applicable).
    pub task_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a rubric for issues that do not prevent grading.
pub fn validate_rubric(rubric: &Rubric) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Check for duplicate task IDs
    let mut seen_ids = HashSet::new();
    for task in &rubric.tasks {
        if !seen_ids.insert(task.id()) {
            warnings.push(ValidationWarning {
                task_id: Some(task.id().to_string()),
                message: format!("duplicate task ID: {}", task.id()),
            });
        }
    }

    // Duplicate labels make the checklist ambiguous
    for task in &rubric.tasks {
        let mut labels = HashSet::new();
        for check in task.checks() {
            if !labels.insert(check.label.as_str()) {
                warnings.push(ValidationWarning {
                    task_id: Some(task.id().to_string()),
                    message: format!("duplicate check label: {}", check.label),
                });
            }
        }
    }

    // Artifacts no task requires are read for nothing
    for artifact in &rubric.artifacts {
        let used = rubric
            .tasks
            .iter()
            .any(|t| t.files().iter().any(|f| f == &artifact.id));
        if !used {
            warnings.push(ValidationWarning {
                task_id: None,
                message: format!("artifact '{}' is not required by any task", artifact.id),
            });
        }
    }

    // A required file no check reads only acts as a prerequisite
    for task in &rubric.tasks {
        for file in task.files() {
            if !task.checks().iter().any(|c| &c.artifact == file) {
                warnings.push(ValidationWarning {
                    task_id: Some(task.id().to_string()),
                    message: format!("'{file}' is required but no check reads it"),
                });
            }
        }
    }

    if rubric.submission.late_marks() == rubric.submission.full_marks() {
        warnings.push(ValidationWarning {
            task_id: None,
            message: "late_marks equals full_marks; the deadline has no effect".into(),
        });
    }

    warnings
}
