//! Tool configuration (`markscan.toml`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level markscan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkscanConfig {
    /// Rubric used when `grade` is run without `--rubric`.
    #[serde(default)]
    pub rubric: Option<PathBuf>,
    /// Where feedback, grade sheet and reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Student column of the grade sheet.
    #[serde(default = "default_student")]
    pub student: String,
    /// Upper bound on the `git log` probe.
    #[serde(default = "default_git_timeout")]
    pub git_timeout_secs: u64,
    /// Append the Markdown summary to `$GITHUB_STEP_SUMMARY` when it is set.
    #[serde(default = "default_true")]
    pub step_summary: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("artifacts")
}
fn default_student() -> String {
    "all_students".to_string()
}
fn default_git_timeout() -> u64 {
    10
}
fn default_true() -> bool {
    true
}

impl Default for MarkscanConfig {
    fn default() -> Self {
        Self {
            rubric: None,
            output_dir: default_output_dir(),
            student: default_student(),
            git_timeout_secs: default_git_timeout(),
            step_summary: true,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables expand to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `markscan.toml` in the current directory
/// 2. `~/.config/markscan/config.toml`
///
/// Environment variable overrides: `MARKSCAN_OUTPUT_DIR`, `MARKSCAN_STUDENT`.
pub fn load_config() -> Result<MarkscanConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MarkscanConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("markscan.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<MarkscanConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MarkscanConfig::default(),
    };

    // Apply env var overrides
    if let Ok(dir) = std::env::var("MARKSCAN_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    if let Ok(student) = std::env::var("MARKSCAN_STUDENT") {
        config.student = student;
    }

    config.rubric = config.rubric.as_deref().map(resolve_path);
    config.output_dir = resolve_path(&config.output_dir);
    config.student = resolve_env_vars(&config.student);

    anyhow::ensure!(
        config.git_timeout_secs > 0,
        "git_timeout_secs must be at least 1"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("markscan"))
}
