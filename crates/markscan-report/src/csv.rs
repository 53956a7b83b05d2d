//! Grade sheet in CSV form (`student,score,max_score`).

use std::path::Path;

use anyhow::{Context, Result};

use markscan_core::report::GradingReport;

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// One header line and one row for `student`.
pub fn generate_grade_csv(report: &GradingReport, student: &str) -> String {
    format!(
        "student,score,max_score\n{},{},{}\n",
        csv_field(student),
        report.total,
        report.total_max
    )
}

/// Write the grade sheet, creating parent directories.
pub fn write_grade_csv(report: &GradingReport, student: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, generate_grade_csv(report, student))
        .with_context(|| format!("failed to write grade sheet to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_report;

    #[test]
    fn header_and_row() {
        let csv = generate_grade_csv(&sample_report(), "all_students");
        assert_eq!(csv, "student,score,max_score\nall_students,43.33,80\n");
    }

    #[test]
    fn quotes_awkward_names() {
        let csv = generate_grade_csv(&sample_report(), "Doe, \"JD\"");
        assert!(csv.contains("\"Doe, \"\"JD\"\"\",43.33,80"));
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("grade.csv");
        write_grade_csv(&sample_report(), "s", &path).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().starts_with("student,"));
    }
}
