//! Locating artifact files inside a project.

use std::path::{Path, PathBuf};

use markscan_core::model::Artifact;

/// Find the file for `artifact` under `root`.
///
/// Each candidate is tried in every search directory first (candidate
/// order wins over directory order). Failing that, the whole tree is walked
/// and the first file whose basename matches a candidate, ignoring case,
/// is returned.
pub fn find_artifact(root: &Path, artifact: &Artifact, ignore_dirs: &[String]) -> Option<PathBuf> {
    let preferred = artifact.candidates.iter().find_map(|candidate| {
        artifact
            .search_dirs
            .iter()
            .map(|dir| root.join(dir).join(candidate))
            .find(|path| path.is_file())
    });
    if let Some(path) = preferred {
        return Some(path);
    }

    let wanted: Vec<String> = artifact
        .candidates
        .iter()
        .map(|c| c.to_lowercase())
        .collect();

    list_files(root, ignore_dirs).into_iter().find(|path| {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| wanted.contains(&n.to_lowercase()))
            .unwrap_or(false)
    })
}

/// All regular files under `root`, depth first in name order, skipping
/// directories named in `ignore_dirs`. Symlinked directories are not followed.
pub fn list_files(root: &Path, ignore_dirs: &[String]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, ignore_dirs, &mut out);
    out
}

fn walk(dir: &Path, ignore_dirs: &[String], out: &mut Vec<PathBuf>) {
    let mut entries: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).collect(),
        Err(e) => {
            tracing::debug!("skipping {}: {e}", dir.display());
            return;
        }
    };
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() {
            let name = entry.file_name();
            let skip = name
                .to_str()
                .map(|n| ignore_dirs.iter().any(|d| d == n))
                .unwrap_or(false);
            if !skip {
                walk(&path, ignore_dirs, out);
            }
        } else if file_type.is_file() {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markscan_core::model::ProjectLayout;

    fn artifact(candidates: &[&str]) -> Artifact {
        Artifact {
            id: "app".into(),
            name: candidates[0].into(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            search_dirs: vec!["src/components".into(), "src".into()],
        }
    }

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "x").unwrap();
    }

    fn ignore() -> Vec<String> {
        ProjectLayout::default().ignore_dirs
    }

    #[test]
    fn search_dirs_are_tried_first() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a/App.jsx");
        write(tmp.path(), "src/App.jsx");
        write(tmp.path(), "src/components/App.jsx");

        let found = find_artifact(tmp.path(), &artifact(&["App.jsx"]), &ignore()).unwrap();
        assert_eq!(found, tmp.path().join("src/components/App.jsx"));
    }

    #[test]
    fn candidate_order_beats_directory_order() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "src/components/App.js");
        write(tmp.path(), "src/App.jsx");

        let found = find_artifact(tmp.path(), &artifact(&["App.jsx", "App.js"]), &ignore()).unwrap();
        assert_eq!(found, tmp.path().join("src/App.jsx"));
    }

    #[test]
    fn full_walk_matches_case_insensitively() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "lib/ui/app.JSX");

        let found = find_artifact(tmp.path(), &artifact(&["App.jsx"]), &ignore()).unwrap();
        assert_eq!(found, tmp.path().join("lib/ui/app.JSX"));
    }

    #[test]
    fn ignored_dirs_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "node_modules/pkg/App.jsx");
        write(tmp.path(), "dist/App.jsx");

        assert!(find_artifact(tmp.path(), &artifact(&["App.jsx"]), &ignore()).is_none());
    }

    #[test]
    fn list_files_is_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "b.txt");
        write(tmp.path(), "a/z.txt");
        write(tmp.path(), "c.txt");

        let files: Vec<_> = list_files(tmp.path(), &[])
            .into_iter()
            .map(|p| p.strip_prefix(tmp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            files,
            vec![PathBuf::from("a/z.txt"), PathBuf::from("b.txt"), PathBuf::from("c.txt")]
        );
    }
}
