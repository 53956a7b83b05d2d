//! Per-task grading results.

use serde::{Deserialize, Serialize};

/// Outcome of one check. Fixed once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub label: String,
    pub passed: bool,
}

/// Score and feedback for a single task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub id: String,
    pub name: String,
    pub max: f64,
    pub score: f64,
    /// Outcomes in declaration order. Empty when the task failed outright.
    pub checklist: Vec<CheckOutcome>,
    /// Why marks were lost.
    pub deductions: Vec<String>,
}

impl TaskResult {
    /// Checks that passed.
    pub fn found(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checklist.iter().filter(|c| c.passed)
    }

    /// Checks that failed.
    pub fn missed(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checklist.iter().filter(|c| !c.passed)
    }

    /// True when the task was not evaluated because a required file was absent.
    pub fn failed_outright(&self) -> bool {
        self.checklist.is_empty() && !self.deductions.is_empty()
    }

    pub fn is_full_marks(&self) -> bool {
        self.score >= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_and_missed_partition_checklist() {
        let result = TaskResult {
            id: "t1".into(),
            name: "Task 1".into(),
            max: 20.0,
            score: 10.0,
            checklist: vec![
                CheckOutcome {
                    label: "a".into(),
                    passed: true,
                },
                CheckOutcome {
                    label: "b".into(),
                    passed: false,
                },
            ],
            deductions: vec!["Missing: b".into()],
        };
        assert_eq!(result.found().count(), 1);
        assert_eq!(result.missed().next().unwrap().label, "b");
        assert!(!result.failed_outright());
        assert!(!result.is_full_marks());
    }
}
