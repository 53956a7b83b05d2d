//! The `markscan grade` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use markscan_core::engine::{GradingEngine, ProgressReporter};
use markscan_core::parser;
use markscan_core::report::{ArtifactStatus, ArtifactSummary, GradingReport};
use markscan_core::results::TaskResult;
use markscan_core::timing::SubmissionTime;
use markscan_report::csv::write_grade_csv;
use markscan_report::markdown::{append_step_summary, generate_summary, write_feedback, RunContext};
use markscan_report::sarif::write_sarif_report;
use markscan_runner::config::load_config_from;
use markscan_runner::{git, LocalWorkspace};

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_artifact(&self, summary: &ArtifactSummary) {
        match summary.status {
            ArtifactStatus::Found => eprintln!(
                "  Found: {} -> {}",
                summary.name,
                summary.path.as_deref().unwrap_or("")
            ),
            ArtifactStatus::Unreadable => eprintln!(
                "  Unreadable: {} at {}",
                summary.name,
                summary.path.as_deref().unwrap_or("")
            ),
            ArtifactStatus::NotFound => eprintln!("  Missing: {}", summary.name),
        }
        for note in &summary.notes {
            eprintln!("    note: {note}");
        }
    }

    fn on_task_complete(&self, result: &TaskResult) {
        let passed = result.found().count();
        eprintln!(
            "  Graded: {} [{}/{} checks] {}/{}",
            result.id,
            passed,
            result.checklist.len(),
            result.score,
            result.max
        );
    }

    fn on_run_complete(&self, report: &GradingReport) {
        eprintln!("\nComplete: {}/{}", report.total, report.total_max);
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    rubric_path: Option<PathBuf>,
    root: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
    submitted_at: Option<String>,
    student: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    // Load config
    let config = load_config_from(config_path.as_deref())?;

    let rubric_path = rubric_path
        .or_else(|| config.rubric.clone())
        .context("no rubric given: pass --rubric or set `rubric` in markscan.toml")?;
    let rubric = parser::parse_rubric(&rubric_path)?;
    for w in parser::validate_rubric(&rubric) {
        match &w.task_id {
            Some(id) => tracing::warn!("[{id}] {}", w.message),
            None => tracing::warn!("{}", w.message),
        }
    }

    let working_dir = match root {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    anyhow::ensure!(
        working_dir.is_dir(),
        "root is not a directory: {}",
        working_dir.display()
    );

    let workspace = LocalWorkspace::detect(&working_dir, &rubric.project);

    let submitted = match &submitted_at {
        Some(raw) => SubmissionTime::parse(raw),
        None => {
            let timeout = Duration::from_secs(config.git_timeout_secs);
            git::last_commit_time(&working_dir, timeout).await
        }
    };

    eprintln!(
        "markscan v{} - Grading {} ({} tasks, {} checks)",
        env!("CARGO_PKG_VERSION"),
        rubric.name,
        rubric.tasks.len(),
        rubric.check_count()
    );
    eprintln!();

    let engine = GradingEngine::new(&rubric);
    let report = engine.run(&workspace, &submitted, &ConsoleReporter);

    // Print summary table
    print_summary(&report);

    // Save outputs
    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let student = student.unwrap_or_else(|| config.student.clone());
    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;

    let feedback_path = output.join("feedback").join("README.md");
    let ctx = RunContext {
        working_dir: working_dir.clone(),
        project_root: workspace.root().to_path_buf(),
        feedback_path: feedback_path.display().to_string(),
    };

    let formats: Vec<&str> = if format == "all" {
        vec!["markdown", "csv", "json", "sarif"]
    } else {
        format.split(',').map(|s| s.trim()).collect()
    };

    for fmt in &formats {
        match *fmt {
            "markdown" => {
                write_feedback(&report, &ctx, &feedback_path)?;
                eprintln!("Feedback: {}", feedback_path.display());
            }
            "csv" => {
                let path = output.join("grade.csv");
                write_grade_csv(&report, &student, &path)?;
                eprintln!("Grade sheet: {}", path.display());
            }
            "json" => {
                let path = output.join("report.json");
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "sarif" => {
                let path = output.join("report.sarif");
                write_sarif_report(&report, &path)?;
                eprintln!("SARIF report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    if config.step_summary {
        if let Some(path) = std::env::var_os("GITHUB_STEP_SUMMARY").filter(|p| !p.is_empty()) {
            append_step_summary(&generate_summary(&report, &ctx), &PathBuf::from(path))?;
        }
    }

    println!(
        "✔ Graded: {}/{} (Submission: {}/{}, Tasks: {}/{}).",
        report.total,
        report.total_max,
        report.submission.score,
        report.submission.max,
        report.tasks_score,
        report.tasks_max
    );

    Ok(())
}

fn print_summary(report: &GradingReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Component", "Checks", "Marks"]);

    for task in &report.tasks {
        let checks = if task.failed_outright() {
            "-".to_string()
        } else {
            format!("{}/{}", task.found().count(), task.checklist.len())
        };
        table.add_row(vec![
            Cell::new(&task.name),
            Cell::new(checks),
            Cell::new(format!("{}/{}", task.score, task.max)),
        ]);
    }

    let timing = if report.submission.late {
        "late"
    } else {
        "on time"
    };
    table.add_row(vec![
        Cell::new("Submission (timing)"),
        Cell::new(timing),
        Cell::new(format!(
            "{}/{}",
            report.submission.score, report.submission.max
        )),
    ]);
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(""),
        Cell::new(format!("{}/{}", report.total, report.total_max)),
    ]);

    eprintln!("\n{table}");
}
