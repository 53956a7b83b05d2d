//! Project root detection.

use std::path::{Path, PathBuf};

use markscan_core::model::ProjectLayout;

/// Whether `dir` contains every marker. Markers ending in `/` must be
/// directories; the rest only have to exist.
pub fn is_project_dir(dir: &Path, markers: &[String]) -> bool {
    markers.iter().all(|marker| match marker.strip_suffix('/') {
        Some(name) => dir.join(name).is_dir(),
        None => dir.join(marker).exists(),
    })
}

/// Pick the project root starting from `cwd`.
///
/// Tries `cwd` itself, then the layout's preferred sub-folder, then the
/// first immediate subdirectory (by name) that satisfies the markers.
/// Falls back to `cwd`.
pub fn detect_project_root(cwd: &Path, layout: &ProjectLayout) -> PathBuf {
    if is_project_dir(cwd, &layout.markers) {
        return cwd.to_path_buf();
    }

    if let Some(preferred) = &layout.preferred_dir {
        let candidate = cwd.join(preferred);
        if is_project_dir(&candidate, &layout.markers) {
            return candidate;
        }
    }

    let mut subdirs: Vec<PathBuf> = match std::fs::read_dir(cwd) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| e.path())
            .collect(),
        Err(e) => {
            tracing::warn!("could not list {}: {e}", cwd.display());
            Vec::new()
        }
    };
    subdirs.sort();

    if let Some(found) = subdirs
        .into_iter()
        .find(|dir| is_project_dir(dir, &layout.markers))
    {
        return found;
    }

    tracing::debug!("no project markers found, using {}", cwd.display());
    cwd.to_path_buf()
}
