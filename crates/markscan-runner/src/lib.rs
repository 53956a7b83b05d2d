//! markscan-runner — Local project access for grading.
//!
//! Detects the project root, locates each rubric artifact on disk, reads
//! the last commit time from git, and loads the tool configuration.

pub mod config;
pub mod discovery;
pub mod git;
pub mod project;

use std::path::{Path, PathBuf};

use markscan_core::model::{Artifact, ProjectLayout};
use markscan_core::traits::{ArtifactContent, ArtifactSource};

/// Artifact source backed by a project directory on disk.
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    root: PathBuf,
    ignore_dirs: Vec<String>,
}

impl LocalWorkspace {
    /// Use `root` as the project root as-is.
    pub fn new(root: PathBuf, layout: &ProjectLayout) -> Self {
        Self {
            root,
            ignore_dirs: layout.ignore_dirs.clone(),
        }
    }

    /// Detect the project root starting from `start`.
    pub fn detect(start: &Path, layout: &ProjectLayout) -> Self {
        let root = project::detect_project_root(start, layout);
        tracing::info!("project root: {}", root.display());
        Self::new(root, layout)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the artifact lives, if anywhere.
    pub fn locate(&self, artifact: &Artifact) -> Option<PathBuf> {
        discovery::find_artifact(&self.root, artifact, &self.ignore_dirs)
    }
}

impl ArtifactSource for LocalWorkspace {
    fn read(&self, artifact: &Artifact) -> ArtifactContent {
        let Some(path) = self.locate(artifact) else {
            return ArtifactContent::NotFound;
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => ArtifactContent::Found { path, text },
            Err(e) => ArtifactContent::Unreadable {
                path,
                reason: e.to_string(),
            },
        }
    }
}
