//! The `markscan strip` command.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use markscan_core::scanner;

pub fn execute(file: PathBuf, check: bool) -> Result<()> {
    let source = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let scan = scanner::scan(&source);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(scan.cleaned.as_bytes())?;
    stdout.flush()?;

    if let Some(open) = scan.unterminated {
        if check {
            anyhow::bail!("{}: {open}", file.display());
        }
        eprintln!("warning: {}: {open}", file.display());
    }

    Ok(())
}
