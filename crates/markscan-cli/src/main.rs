//! markscan CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "markscan", version, about = "Lenient static-analysis autograder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a project against a rubric
    Grade {
        /// Rubric TOML file (defaults to `rubric` in markscan.toml)
        #[arg(long)]
        rubric: Option<PathBuf>,

        /// Directory to start project-root detection from (default: cwd)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Output directory (default: artifacts)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Outputs to write: markdown, csv, json, sarif, all
        #[arg(long, default_value = "markdown,csv,json")]
        format: String,

        /// Submission time (RFC 3339); skips the git probe
        #[arg(long)]
        submitted_at: Option<String>,

        /// Student name for the grade sheet
        #[arg(long)]
        student: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate rubric TOML files
    Validate {
        /// Path to rubric file or directory
        #[arg(long)]
        rubric: PathBuf,
    },

    /// Print a source file with comments removed
    Strip {
        /// Source file to clean
        file: PathBuf,

        /// Fail if a literal or block comment is left open
        #[arg(long)]
        check: bool,
    },

    /// Create starter config and example rubric
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("markscan=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            rubric,
            root,
            output,
            format,
            submitted_at,
            student,
            config,
        } => {
            commands::grade::execute(rubric, root, output, format, submitted_at, student, config)
                .await
        }
        Commands::Validate { rubric } => commands::validate::execute(rubric),
        Commands::Strip { file, check } => commands::strip::execute(file, check),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
