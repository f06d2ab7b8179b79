//! Branch listing, creation, deletion, rename.

use anyhow::{Result, bail};

use crate::history;
use crate::object::KIND_COMMIT;
use crate::refs::branch_ref_name;
use crate::repository::Repository;

/// Print all local branches, marking the current one with `*`.
pub fn list(repo: &Repository) -> Result<()> {
    let branches = repo.refs.list_branches()?;
    if branches.is_empty() {
        println!("no branches yet");
        return Ok(());
    }

    let current = repo.current_branch()?;

    for branch in branches {
        let marker = if current.as_deref() == Some(branch.as_str()) { "* " } else { "  " };
        let hash = repo
            .resolve_to_commit(&branch)
            .map_or_else(|_| "?".to_string(), |h| crate::hash::hash_to_hex(&h)[..8].to_string());
        println!("{marker}{branch}  {hash}");
    }

    Ok(())
}

/// Create a new branch pointing at `target` (branch name, commit hash, or
/// HEAD when `target` is `None`).
pub fn create(repo: &Repository, name: &str, target: Option<&str>) -> Result<()> {
    if repo.refs.branch_exists(name) {
        bail!("branch '{name}' already exists");
    }

    validate_branch_name(name)?;

    let hash = match target {
        Some(t) => repo.resolve_to_commit(t)?,
        None => repo.read_head_commit()?,
    };

    repo.store.get(&hash, Some(KIND_COMMIT))?;
    repo.refs.write_direct(&branch_ref_name(name), &hash)?;
    println!("created branch '{name}' at {}", &crate::hash::hash_to_hex(&hash)[..8]);

    Ok(())
}

/// Safe delete: refuses if the branch has commits not reachable from any
/// other branch.
pub fn delete(repo: &Repository, name: &str) -> Result<()> {
    if !repo.refs.branch_exists(name) {
        bail!("branch '{name}' not found");
    }
    if repo.current_branch()?.as_deref() == Some(name) {
        bail!("cannot delete branch '{name}': it is currently checked out");
    }

    let branch_hash = repo.resolve_to_commit(name)?;

    let mut other_reachable = std::collections::HashSet::new();
    for other in repo.refs.list_branches()? {
        if other == name {
            continue;
        }
        if let Ok(hash) = repo.resolve_to_commit(&other) {
            other_reachable.extend(history::ancestors(&repo.store, hash));
        }
    }

    if !other_reachable.contains(&branch_hash) {
        bail!(
            "branch '{name}' has commits that are not merged into any other branch.\n\
             use 'fangs branch -D {name}' to force delete."
        );
    }

    repo.refs.remove_branch(name)?;
    println!("deleted branch '{name}'");
    Ok(())
}

pub fn force_delete(repo: &Repository, name: &str) -> Result<()> {
    if !repo.refs.branch_exists(name) {
        bail!("branch '{name}' not found");
    }
    if repo.current_branch()?.as_deref() == Some(name) {
        bail!("cannot delete branch '{name}': it is currently checked out");
    }

    let hash = repo.resolve_to_commit(name)?;
    repo.refs.remove_branch(name)?;
    println!("force-deleted branch '{name}' (was {})", &crate::hash::hash_to_hex(&hash)[..8]);
    Ok(())
}

fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("branch name cannot be empty");
    }
    if name.contains('/') {
        bail!("branch name cannot contain '/' (namespaced branches not supported)");
    }
    if name.contains(' ') || name.contains('\t') {
        bail!("branch name cannot contain whitespace");
    }
    if name.starts_with('-') {
        bail!("branch name cannot start with '-'");
    }
    if name == "HEAD" {
        bail!("'HEAD' is not a valid branch name");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commit, index::Index};

    fn init_with_commit() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut index = Index::default();
        index.upsert("a.txt", crate::hash::hash_bytes(b"hello"));
        index.save(&repo.fangs_dir).unwrap();
        commit::commit(&repo, "m1").unwrap();
        (dir, repo)
    }

    #[test]
    fn create_duplicate_branch_fails() {
        let (_dir, repo) = init_with_commit();
        create(&repo, "feat", None).unwrap();
        assert!(create(&repo, "feat", None).is_err());
    }

    #[test]
    fn invalid_branch_names_are_rejected() {
        let (_dir, repo) = init_with_commit();
        assert!(create(&repo, "HEAD", None).is_err());
        assert!(create(&repo, "has space", None).is_err());
        assert!(create(&repo, "has/slash", None).is_err());
    }

    #[test]
    fn cannot_delete_checked_out_branch() {
        let (_dir, repo) = init_with_commit();
        assert!(delete(&repo, "master").is_err());
    }
}
