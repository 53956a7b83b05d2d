//! The `markscan init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create markscan.toml
    if std::path::Path::new("markscan.toml").exists() {
        println!("markscan.toml already exists, skipping.");
    } else {
        std::fs::write("markscan.toml", SAMPLE_CONFIG)?;
        println!("Created markscan.toml");
    }

    // Create example rubric
    std::fs::create_dir_all("rubrics")?;
    let example_path = std::path::Path::new("rubrics/example.toml");
    if example_path.exists() {
        println!("rubrics/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_RUBRIC)?;
        println!("Created rubrics/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit rubrics/example.toml with your tasks and deadline");
    println!("  2. Run: markscan validate --rubric rubrics/example.toml");
    println!("  3. Run: markscan grade");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# markscan configuration

rubric = "rubrics/example.toml"
output_dir = "artifacts"
student = "all_students"
git_timeout_secs = 10

# Append the Markdown summary to $GITHUB_STEP_SUMMARY when it is set.
step_summary = true
"#;

const EXAMPLE_RUBRIC: &str = r#"[rubric]
id = "example"
name = "Example Lab"
description = "A small rubric to get started"

[submission]
deadline = "2030-01-01T23:59:00+00:00"
full_marks = 20
late_marks = 10

[[artifacts]]
id = "main"
name = "index.js"
candidates = ["index.js", "main.js"]
search_dirs = ["src", "."]

[[tasks]]
id = "greet"
name = "Task 1: Greeting function"
marks = 10
files = ["main"]

[[tasks.checks]]
label = "Declares a greet function"
any_of = ['\bfunction\s+greet\s*\(', '\bconst\s+greet\s*=']

[[tasks.checks]]
label = "Uses a template literal"
any_of = ['`[^`]*\$\{[^}]+\}[^`]*`']

[[tasks]]
id = "export"
name = "Task 2: Export"
marks = 10
files = ["main"]

[[tasks.checks]]
label = "Exports greet"
any_of = ['\bexport\s+(default\s+)?(function\s+)?greet\b', 'module\.exports']

[[tasks.checks]]
label = "Starter placeholder removed"
all_of = [['greet']]
none_of = ['TODO:\s*implement']
"#;
