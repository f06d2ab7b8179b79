//! First-parent history printer.

use anyhow::Result;

use crate::hash;
use crate::object::KIND_COMMIT;
use crate::repository::Repository;

pub fn log(repo: &Repository, f: &mut dyn core::fmt::Write) -> Result<()> {
    let Ok(mut current) = repo.read_head_commit() else {
        writeln!(f, "no commits yet")?;
        return Ok(());
    };

    loop {
        let record = repo.store.get(&current, Some(KIND_COMMIT))?.try_into_commit()?;

        writeln!(f, "commit {}", hash::hash_to_hex(&current))?;
        writeln!(f, "Author: {}", record.author)?;
        writeln!(f, "Date: {}", record.timestamp)?;
        writeln!(f, "\n    {}", record.message)?;
        writeln!(f)?;

        let Some(first_parent) = record.parents.first() else {
            break;
        };
        current = hash::hex_to_hash(first_parent)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commit, index::Index};

    #[test]
    fn log_on_empty_repo_says_no_commits() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut out = String::new();
        log(&repo, &mut out).unwrap();
        assert_eq!(out, "no commits yet\n");
    }

    #[test]
    fn log_walks_first_parent_history() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut index = Index::default();
        index.upsert("a.txt", crate::hash::hash_bytes(b"one"));
        index.save(&repo.fangs_dir).unwrap();
        commit::commit(&repo, "first").unwrap();

        index.upsert("a.txt", crate::hash::hash_bytes(b"two"));
        index.save(&repo.fangs_dir).unwrap();
        commit::commit(&repo, "second").unwrap();

        let mut out = String::new();
        log(&repo, &mut out).unwrap();
        assert!(out.contains("second"));
        assert!(out.contains("first"));
        assert!(out.find("second").unwrap() < out.find("first").unwrap());
    }
}
