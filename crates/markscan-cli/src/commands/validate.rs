//! The `markscan validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(rubric_path: PathBuf) -> Result<()> {
    let rubrics = if rubric_path.is_dir() {
        markscan_core::parser::load_rubric_directory(&rubric_path)?
    } else {
        vec![markscan_core::parser::parse_rubric(&rubric_path)?]
    };

    anyhow::ensure!(
        !rubrics.is_empty(),
        "no valid rubrics found in {}",
        rubric_path.display()
    );

    let mut total_warnings = 0;

    for rubric in &rubrics {
        println!(
            "Rubric: {} ({} tasks, {} checks, {} marks)",
            rubric.name,
            rubric.tasks.len(),
            rubric.check_count(),
            rubric.total_max()
        );

        let warnings = markscan_core::parser::validate_rubric(rubric);
        for w in &warnings {
            let prefix = w
                .task_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All rubrics valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
