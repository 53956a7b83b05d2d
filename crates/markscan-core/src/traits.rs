//! The file-resolution seam between the scoring engines and the outside world.
//!
//! `markscan-runner` implements [`ArtifactSource`] over a project directory;
//! [`MemorySource`] serves tests and library callers that already hold the text.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::model::Artifact;

/// Result of asking a source for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactContent {
    /// The file was located and read.
    Found { path: PathBuf, text: String },
    /// The file was located but could not be read.
    Unreadable { path: PathBuf, reason: String },
    /// No file matched the artifact's candidates.
    NotFound,
}

/// Capability to look up an artifact's raw text.
pub trait ArtifactSource {
    fn read(&self, artifact: &Artifact) -> ArtifactContent;
}

/// In-memory artifact source keyed by artifact id.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, ArtifactContent>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register text for an artifact id. The reported path is the artifact id.
    pub fn with_file(mut self, artifact_id: &str, text: impl Into<String>) -> Self {
        self.files.insert(
            artifact_id.to_string(),
            ArtifactContent::Found {
                path: PathBuf::from(artifact_id),
                text: text.into(),
            },
        );
        self
    }

    /// Register an artifact that exists but cannot be read.
    pub fn with_unreadable(mut self, artifact_id: &str, reason: &str) -> Self {
        self.files.insert(
            artifact_id.to_string(),
            ArtifactContent::Unreadable {
                path: PathBuf::from(artifact_id),
                reason: reason.to_string(),
            },
        );
        self
    }
}

impl ArtifactSource for MemorySource {
    fn read(&self, artifact: &Artifact) -> ArtifactContent {
        self.files
            .get(&artifact.id)
            .cloned()
            .unwrap_or(ArtifactContent::NotFound)
    }
}
