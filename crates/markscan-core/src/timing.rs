//! Deadline-based submission scoring.
//!
//! The policy yields exactly one of two scores. A timestamp that cannot be
//! determined or parsed counts as late.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::RubricError;

pub const DEFAULT_FULL_MARKS: f64 = 20.0;
pub const DEFAULT_LATE_MARKS: f64 = 10.0;

/// When the work was submitted, as far as the collaborator could tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionTime {
    Known(DateTime<FixedOffset>),
    /// A timestamp was obtained but is not RFC 3339.
    Unparseable(String),
    /// No timestamp could be obtained at all.
    Unknown,
}

impl SubmissionTime {
    /// Parse an RFC 3339 timestamp. Never fails; bad input is kept for reporting.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return SubmissionTime::Unknown;
        }
        match DateTime::parse_from_rfc3339(trimmed) {
            Ok(ts) => SubmissionTime::Known(ts),
            Err(e) => {
                tracing::warn!("unparseable submission timestamp '{trimmed}': {e}");
                SubmissionTime::Unparseable(trimmed.to_string())
            }
        }
    }

    pub fn as_known(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            SubmissionTime::Known(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// Fixed deadline plus the two possible submission scores.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPolicy {
    deadline: DateTime<FixedOffset>,
    full_marks: f64,
    late_marks: f64,
}

impl SubmissionPolicy {
    pub fn new(
        deadline: DateTime<FixedOffset>,
        full_marks: f64,
        late_marks: f64,
    ) -> Result<Self, RubricError> {
        let valid = full_marks.is_finite()
            && late_marks.is_finite()
            && late_marks >= 0.0
            && late_marks <= full_marks;
        if !valid {
            return Err(RubricError::InvalidSubmissionMarks {
                full: full_marks,
                late: late_marks,
            });
        }
        Ok(Self {
            deadline,
            full_marks,
            late_marks,
        })
    }

    /// Build a policy from an RFC 3339 deadline string.
    pub fn parse(deadline: &str, full_marks: f64, late_marks: f64) -> Result<Self, RubricError> {
        let deadline =
            DateTime::parse_from_rfc3339(deadline.trim()).map_err(|e| RubricError::InvalidDeadline {
                value: deadline.to_string(),
                reason: e.to_string(),
            })?;
        Self::new(deadline, full_marks, late_marks)
    }

    pub fn deadline(&self) -> DateTime<FixedOffset> {
        self.deadline
    }

    pub fn full_marks(&self) -> f64 {
        self.full_marks
    }

    pub fn late_marks(&self) -> f64 {
        self.late_marks
    }

    /// Classify a submission. The deadline itself is on time.
    pub fn assess(&self, submitted: &SubmissionTime) -> SubmissionRecord {
        let late = match submitted {
            SubmissionTime::Known(ts) => *ts > self.deadline,
            SubmissionTime::Unparseable(_) | SubmissionTime::Unknown => true,
        };
        let score = if late {
            self.late_marks
        } else {
            self.full_marks
        };
        let raw = match submitted {
            SubmissionTime::Known(ts) => Some(ts.to_rfc3339()),
            SubmissionTime::Unparseable(raw) => Some(raw.clone()),
            SubmissionTime::Unknown => None,
        };

        tracing::debug!(late, score, "assessed submission time");

        SubmissionRecord {
            submitted_at: submitted.as_known(),
            raw,
            deadline: self.deadline,
            late,
            score,
            max: self.full_marks,
        }
    }
}

/// Outcome of the timing policy for one grading run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Parsed submission time, when there was one.
    pub submitted_at: Option<DateTime<FixedOffset>>,
    /// The timestamp as obtained, even if it did not parse.
    pub raw: Option<String>,
    pub deadline: DateTime<FixedOffset>,
    pub late: bool,
    pub score: f64,
    pub max: f64,
}
