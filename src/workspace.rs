//! Working-tree scanning and path status classification.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use walkdir::WalkDir;

use crate::hash::{self, Hash};
use crate::index::{self, Index};
use crate::object::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Untracked,
    UnstagedModified,
    UnstagedDeleted,
    StagedNew,
    StagedModified,
    StagedDeleted,
}

#[derive(Debug, Default)]
pub struct StatusReport {
    pub untracked: Vec<String>,
    pub unstaged_modified: Vec<String>,
    pub unstaged_deleted: Vec<String>,
    pub staged_new: Vec<String>,
    pub staged_modified: Vec<String>,
    pub staged_deleted: Vec<String>,
}

/// Enumerate every regular file under `root`, skipping `metadata_dir`.
/// Returns repository-relative, forward-slash paths.
pub fn walk_files(root: &Path, metadata_dir: &str) -> Result<Vec<String>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_map(std::result::Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if rel.components().next().map(|c| c.as_os_str() == metadata_dir).unwrap_or(false) {
            continue;
        }

        let normalized = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        paths.push(normalized);
    }

    paths.sort_unstable();
    Ok(paths)
}

pub fn hash_file(root: &Path, rel_path: &str) -> Result<Hash> {
    let bytes = std::fs::read(root.join(rel_path))?;
    Ok(hash::hash_bytes(&hash::canonical_bytes(crate::object::KIND_BLOB, &bytes)))
}

/// Build the status report per §4.5. `head_tree` is `None` when HEAD is
/// unborn, in which case every index entry is `StagedNew`.
pub fn collect_status(root: &Path, metadata_dir: &str, index: &Index, head_tree: Option<&Tree>) -> Result<StatusReport> {
    let mut report = StatusReport::default();

    let working_paths = walk_files(root, metadata_dir)?;
    let working_set: BTreeSet<&str> = working_paths.iter().map(String::as_str).collect();

    for path in &working_paths {
        match index.get(path) {
            None => report.untracked.push(path.clone()),
            Some(indexed_id) => {
                let working_id = hash_file(root, path)?;
                if working_id != *indexed_id {
                    report.unstaged_modified.push(path.clone());
                }
            }
        }
    }

    for (path, _) in index.entries() {
        if !working_set.contains(path) {
            report.unstaged_deleted.push(path.to_string());
        }
    }

    for (path, id) in index.entries() {
        let id_hex = hash::hash_to_hex(id);
        match head_tree {
            None => report.staged_new.push(path.to_string()),
            Some(tree) => match tree.get(path) {
                None => report.staged_new.push(path.to_string()),
                Some(head_id) if *head_id != id_hex => report.staged_modified.push(path.to_string()),
                Some(_) => {}
            },
        }
    }

    if let Some(tree) = head_tree {
        for path in tree.keys() {
            if index.get(path).is_none() {
                report.staged_deleted.push(path.clone());
            }
        }
    }

    Ok(report)
}

/// Normalize and validate one or more user-supplied paths against the
/// repository root, for `add`.
pub fn normalize_many(root: &Path, paths: &[std::path::PathBuf]) -> Result<Vec<String>> {
    paths.iter().map(|p| index::normalize_path(root, p)).collect()
}
