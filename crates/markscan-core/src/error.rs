//! Rubric configuration errors.
//!
//! These are setup-time failures. Once a rubric has loaded, grading itself
//! never fails: missing files and bad timestamps degrade to a zero score or a
//! late classification instead.

use thiserror::Error;

/// Errors raised while building a rubric.
#[derive(Debug, Error)]
pub enum RubricError {
    /// A task declares no checks, so no per-check share can be computed.
    #[error("task '{0}' has no checks")]
    EmptyTask(String),

    /// The rubric declares no tasks.
    #[error("rubric declares no tasks")]
    NoTasks,

    /// Task marks must be finite and positive.
    #[error("task '{task}' has invalid marks {marks}")]
    InvalidMarks { task: String, marks: f64 },

    /// A pattern failed to compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A check has no pattern that must be present.
    #[error("check '{label}' in task '{task}' has no required pattern")]
    EmptyCheck { task: String, label: String },

    /// A task or check refers to an artifact the rubric does not declare.
    #[error("task '{task}' refers to unknown artifact '{artifact}'")]
    UnknownArtifact { task: String, artifact: String },

    /// A check reads an artifact its task does not require.
    #[error("check '{label}' in task '{task}' reads '{artifact}', which the task does not require")]
    ArtifactNotRequired {
        task: String,
        label: String,
        artifact: String,
    },

    /// Two artifacts share an id.
    #[error("duplicate artifact id '{0}'")]
    DuplicateArtifact(String),

    /// An artifact lists no candidate file names.
    #[error("artifact '{0}' has no candidate file names")]
    NoCandidates(String),

    /// The submission deadline is not RFC 3339.
    #[error("invalid deadline '{value}': {reason}")]
    InvalidDeadline { value: String, reason: String },

    /// Late marks must lie in `[0, full_marks]`.
    #[error("invalid submission marks: full {full}, late {late}")]
    InvalidSubmissionMarks { full: f64, late: f64 },
}

impl RubricError {
    /// The task this error belongs to, if any.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            RubricError::EmptyTask(task)
            | RubricError::InvalidMarks { task, .. }
            | RubricError::EmptyCheck { task, .. }
            | RubricError::UnknownArtifact { task, .. }
            | RubricError::ArtifactNotRequired { task, .. } => Some(task),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let e = RubricError::EmptyTask("t1".into());
        assert_eq!(e.to_string(), "task 't1' has no checks");
        assert_eq!(e.task_id(), Some("t1"));

        let e = RubricError::DuplicateArtifact("app".into());
        assert!(e.to_string().contains("app"));
        assert_eq!(e.task_id(), None);
    }
}
