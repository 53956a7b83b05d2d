//! Markdown summary and per-task feedback.
//!
//! The summary is meant for a CI job summary page; the feedback file is the
//! student-facing `feedback/README.md`.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use markscan_core::report::{ArtifactStatus, GradingReport};
use markscan_core::results::TaskResult;

/// Where the run happened. Not part of the grading report itself.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory the grader was started from.
    pub working_dir: PathBuf,
    /// Detected project root.
    pub project_root: PathBuf,
    /// Feedback file location as shown to the reader.
    pub feedback_path: String,
}

/// Escape angle brackets so labels like `<TaskItem />` render as text.
pub fn md_escape(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

fn submission_section(report: &GradingReport) -> String {
    let sub = &report.submission;
    let status = if sub.late {
        "(Late submission)"
    } else {
        "(On time)"
    };
    let mut out = String::new();
    out.push_str(&format!("- **Rubric:** {}\n", report.rubric.name));
    out.push_str(&format!("- **Deadline:** {}\n", sub.deadline.to_rfc3339()));
    out.push_str(&format!(
        "- **Last commit time (from git log):** {}\n",
        sub.raw.as_deref().unwrap_or("unknown")
    ));
    out.push_str(&format!(
        "- **Submission marks:** **{}/{}** {status}\n",
        sub.score, sub.max
    ));
    out
}

fn files_section(report: &GradingReport, ctx: &RunContext) -> String {
    let mut out = String::new();
    out.push_str(&format!("- Repo root (cwd): {}\n", ctx.working_dir.display()));
    out.push_str(&format!("- Detected project root: {}\n", ctx.project_root.display()));
    for artifact in &report.artifacts {
        let path = artifact.path.as_deref().unwrap_or("");
        let line = match artifact.status {
            ArtifactStatus::Found => format!("✅ {path}"),
            ArtifactStatus::Unreadable => format!("⚠️ could not read {path}"),
            ArtifactStatus::NotFound => format!("❌ {} not found", artifact.name),
        };
        out.push_str(&format!("- {}: {line}\n", artifact.name));
        for note in &artifact.notes {
            out.push_str(&format!("  - {note}\n"));
        }
    }
    out
}

fn checklist_lines(task: &TaskResult) -> Vec<String> {
    task.checklist
        .iter()
        .map(|c| format!("{} {}", if c.passed { "✅" } else { "❌" }, c.label))
        .collect()
}

fn bullet_list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        format!("\n- {empty}")
    } else {
        let lines: Vec<String> = items.iter().map(|i| format!("- {}", md_escape(i))).collect();
        format!("\n{}", lines.join("\n"))
    }
}

/// Markdown summary: marks table, total, and a collapsible block per task.
pub fn generate_summary(report: &GradingReport, ctx: &RunContext) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} - Autograding Summary\n\n", report.rubric.name));
    md.push_str("## Submission\n\n");
    md.push_str(&submission_section(report));
    md.push_str("\n## Files Checked\n\n");
    md.push_str(&files_section(report, ctx));

    md.push_str("\n## Marks Breakdown\n\n");
    md.push_str("| Component | Marks |\n|---|---:|\n");
    for task in &report.tasks {
        md.push_str(&format!("| {} | {}/{} |\n", md_escape(&task.name), task.score, task.max));
    }
    md.push_str(&format!(
        "| Submission (timing) | {}/{} |\n",
        report.submission.score, report.submission.max
    ));

    md.push_str("\n## Total Marks\n\n");
    md.push_str(&format!("**{} / {}**\n\n", report.total, report.total_max));
    md.push_str("## Detailed Checks (What you did / missed)\n");

    for task in &report.tasks {
        let found: Vec<String> = task.found().map(|c| format!("✅ {}", c.label)).collect();
        let missed: Vec<String> = task.missed().map(|c| format!("❌ {}", c.label)).collect();

        md.push_str(&format!(
            "\n<details>\n  <summary><strong>{}</strong> - {}/{}</summary>\n\n  <br/>\n\n",
            md_escape(&task.name),
            task.score,
            task.max
        ));
        md.push_str(&format!(
            "  <strong>✅ Found</strong>\n  {}\n\n  <br/><br/>\n\n",
            bullet_list(&found, "(Nothing detected)")
        ));
        md.push_str(&format!(
            "  <strong>❌ Missing</strong>\n  {}\n\n  <br/><br/>\n\n",
            bullet_list(&missed, "(Nothing missing)")
        ));
        md.push_str(&format!(
            "  <strong>❗ Deductions / Notes</strong>\n  {}\n\n</details>\n",
            bullet_list(&task.deductions, "No deductions.")
        ));
    }

    md.push_str(&format!(
        "\n> Full feedback is also available in: `{}`\n",
        ctx.feedback_path
    ));
    md
}

/// Student-facing feedback with a checklist and deductions per task.
pub fn generate_feedback(report: &GradingReport, ctx: &RunContext) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} - Feedback\n\n", report.rubric.name));
    md.push_str("## Submission\n\n");
    md.push_str(&submission_section(report));
    md.push_str("\n## Files Checked\n\n");
    md.push_str(&files_section(report, ctx));
    md.push_str("\n---\n\n## Task-by-Task Feedback\n");

    for task in &report.tasks {
        md.push_str(&format!("\n### {} - **{}/{}**\n\n", task.name, task.score, task.max));
        md.push_str("**Checklist**\n");
        let checklist = checklist_lines(task);
        if checklist.is_empty() {
            md.push_str("- (No checks available)\n");
        } else {
            for line in &checklist {
                md.push_str(&format!("- {line}\n"));
            }
        }

        md.push_str("\n**Deductions / Notes**\n");
        if task.deductions.is_empty() {
            md.push_str("- ✅ No deductions. Good job!\n");
        } else {
            for d in &task.deductions {
                md.push_str(&format!("- ❗ {d}\n"));
            }
        }
    }

    md.push_str(RULES);
    md
}

const RULES: &str = "
---

## How marks were deducted (rules)

- Comments are ignored (so starter TODO comments do NOT count).
- Checks are intentionally light: they look for key constructs and basic structure.
- Code can be in ANY order; repeated code is allowed.
- Common equivalents are accepted, and naming is flexible.
- Missing required items reduce marks proportionally within that task.
";

/// Write the feedback file, creating parent directories.
pub fn write_feedback(report: &GradingReport, ctx: &RunContext, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, generate_feedback(report, ctx))
        .with_context(|| format!("failed to write feedback to {}", path.display()))?;
    Ok(())
}

/// Append the summary to a CI step-summary file such as `$GITHUB_STEP_SUMMARY`.
pub fn append_step_summary(summary: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open step summary {}", path.display()))?;
    file.write_all(summary.as_bytes())
        .with_context(|| format!("failed to append to {}", path.display()))?;
    Ok(())
}
