//! Branch checkout and two-phase working-tree materialization.

use std::path::PathBuf;

use anyhow::Result;

use crate::hash::{self, Hash};
use crate::object::{KIND_BLOB, Tree};
use crate::refs::branch_ref_name;
use crate::repository::Repository;
use crate::workspace;

/// A plan for resetting the working tree to `tree`: what to delete, what
/// to write. Computing the plan never touches disk.
pub struct Plan {
    pub deletions: Vec<PathBuf>,
    pub writes: Vec<(PathBuf, Hash)>,
}

pub fn plan_materialize(repo: &Repository, tree: &Tree) -> Result<Plan> {
    let existing = workspace::walk_files(&repo.root, repo.metadata_dir_name())?;
    let deletions = existing.into_iter().map(|p| repo.root.join(&p)).collect();

    let writes = tree
        .iter()
        .map(|(path, id_hex)| Ok((repo.root.join(path), hash::hex_to_hash(id_hex)?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Plan { deletions, writes })
}

pub fn apply(repo: &Repository, plan: &Plan) -> Result<()> {
    for path in &plan.deletions {
        let _ = std::fs::remove_file(path);
    }
    remove_empty_dirs(&repo.root, repo.metadata_dir_name());

    for (path, id) in &plan.writes {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = repo.store.get(id, Some(KIND_BLOB))?.try_into_blob()?;
        std::fs::write(path, bytes)?;
    }

    Ok(())
}

fn remove_empty_dirs(root: &std::path::Path, metadata_dir: &str) {
    // Bottom-up: walkdir yields children before parents when contents_first.
    for entry in walkdir::WalkDir::new(root).contents_first(true).into_iter().filter_map(std::result::Result::ok) {
        if !entry.file_type().is_dir() || entry.path() == root {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if rel.components().next().map(|c| c.as_os_str() == metadata_dir).unwrap_or(false) {
            continue;
        }
        let _ = std::fs::remove_dir(entry.path());
    }
}

pub fn materialize(repo: &Repository, tree: &Tree) -> Result<()> {
    let plan = plan_materialize(repo, tree)?;
    apply(repo, &plan)
}

/// Switch HEAD to `branch` and replace the working tree with its commit's
/// tree.
pub fn checkout(repo: &Repository, branch: &str) -> Result<()> {
    let _span = tracing::debug_span!("checkout::checkout", branch).entered();

    if !repo.refs.branch_exists(branch) {
        return Err(crate::error::FangsError::UnknownBranch(branch.to_string()).into());
    }

    repo.refs.write_symbolic("HEAD", &branch_ref_name(branch))?;

    let commit_id = repo.read_head_commit()?;
    let tree = repo.read_tree(&commit_id)?;
    materialize(repo, &tree)?;

    tracing::info!(branch, "checked out branch");
    Ok(())
}

/// `checkout -b <branch>`: create the branch at the current HEAD commit
/// if it doesn't already exist, then check it out.
pub fn checkout_new(repo: &Repository, branch: &str) -> Result<()> {
    if !repo.refs.branch_exists(branch) {
        let head = repo.read_head_commit()?;
        repo.refs.write_direct(&branch_ref_name(branch), &head)?;
    }
    checkout(repo, branch)
}
