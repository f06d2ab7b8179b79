//! Commit engine: materialize the staged tree, record a commit, advance
//! the current branch.

use anyhow::Result;
use chrono::Utc;

use crate::config;
use crate::hash::{self, Hash};
use crate::object::{CommitRecord, Object};
use crate::refs::Resolved;
use crate::repository::Repository;

pub fn commit(repo: &Repository, message: &str) -> Result<Hash> {
    let _span = tracing::debug_span!("commit::commit").entered();

    if message.is_empty() {
        return Err(crate::error::FangsError::InvalidInput("commit message must not be empty".into()).into());
    }

    let index = repo.load_index()?;
    if index.is_empty() {
        return Err(crate::error::FangsError::NothingToCommit.into());
    }

    let tree = index.as_flat_tree();
    let tree_id = repo.store.put(&Object::Tree(tree))?;

    let parent = match repo.refs.resolve("HEAD")? {
        Resolved::Id(id) => vec![hash::hash_to_hex(&id)],
        Resolved::Unborn => Vec::new(),
    };

    let record = CommitRecord {
        tree: hash::hash_to_hex(&tree_id),
        parents: parent,
        author: config::resolve_author(&repo.fangs_dir),
        timestamp: Utc::now().to_rfc3339(),
        message: message.to_string(),
    };

    let commit_id = repo.store.put(&Object::Commit(record))?;
    repo.refs.advance_head(&commit_id)?;

    tracing::info!(commit = %hash::hash_to_hex(&commit_id), "created commit");

    Ok(commit_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Index;

    fn init_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn commit_fails_on_empty_index() {
        let (_dir, repo) = init_repo();
        assert!(commit(&repo, "m1").is_err());
    }

    #[test]
    fn commit_fails_on_empty_message() {
        let (_dir, repo) = init_repo();
        let mut index = repo.load_index().unwrap();
        index.upsert("a.txt", hash::hash_bytes(b"hello"));
        index.save(&repo.fangs_dir).unwrap();
        assert!(commit(&repo, "").is_err());
    }

    #[test]
    fn first_commit_has_no_parents_and_advances_branch() {
        let (_dir, repo) = init_repo();
        let mut index = Index::default();
        index.upsert("a.txt", hash::hash_bytes(b"hello"));
        index.save(&repo.fangs_dir).unwrap();

        let commit_id = commit(&repo, "m1").unwrap();
        let record = repo.store.get(&commit_id, Some("commit")).unwrap().try_into_commit().unwrap();
        assert!(record.parents.is_empty());
        assert_eq!(record.message, "m1");

        let head_id = repo.read_head_commit().unwrap();
        assert_eq!(head_id, commit_id);
    }

    #[test]
    fn identical_content_reuses_tree_id_but_not_commit_id() {
        let (_dir, repo) = init_repo();
        let mut index = Index::default();
        index.upsert("a.txt", hash::hash_bytes(b"hello"));
        index.save(&repo.fangs_dir).unwrap();
        let c1 = commit(&repo, "m1").unwrap();
        let r1 = repo.store.get(&c1, Some("commit")).unwrap().try_into_commit().unwrap();

        // Re-add same content, new commit.
        index.save(&repo.fangs_dir).unwrap();
        let c2 = commit(&repo, "m2").unwrap();
        let r2 = repo.store.get(&c2, Some("commit")).unwrap().try_into_commit().unwrap();

        assert_eq!(r1.tree, r2.tree);
        assert_ne!(c1, c2);
    }
}
