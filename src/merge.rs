//! Merge classification, three-way reconciliation, conflict materialization.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::checkout;
use crate::hash::{self, Hash};
use crate::history;
use crate::object::{CommitRecord, KIND_BLOB, Object, Tree};
use crate::refs::{Ref, branch_ref_name};
use crate::repository::Repository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    AlreadyUpToDate,
    FastForward { commit: Hash },
    ThreeWay { commit: Hash },
    Conflict { conflicts: Vec<String> },
}

pub fn merge(repo: &Repository, other_branch: &str) -> Result<MergeOutcome> {
    let _span = tracing::debug_span!("merge::merge", other_branch).entered();

    let current_branch = match repo.refs.read("HEAD")? {
        Some(Ref::Symbolic(target)) => target
            .strip_prefix("refs/heads/")
            .ok_or_else(|| anyhow::anyhow!("HEAD points outside refs/heads/"))?
            .to_string(),
        _ => return Err(crate::error::FangsError::DetachedHead.into()),
    };

    if !repo.refs.branch_exists(other_branch) {
        return Err(crate::error::FangsError::UnknownBranch(other_branch.to_string()).into());
    }

    let c = repo.read_head_commit()?;
    let o = repo.resolve_to_commit(other_branch)?;

    let base = history::merge_base(&repo.store, c, o);

    if base == Some(o) {
        tracing::info!("already up to date");
        return Ok(MergeOutcome::AlreadyUpToDate);
    }

    if base == Some(c) {
        repo.refs.write_direct(&branch_ref_name(&current_branch), &o)?;
        let tree = repo.read_tree(&o)?;
        checkout::materialize(repo, &tree)?;
        tracing::info!(commit = %hash::hash_to_hex(&o), "fast-forwarded");
        return Ok(MergeOutcome::FastForward { commit: o });
    }

    let base = base.ok_or_else(|| anyhow::anyhow!("no common ancestor between branches"))?;

    let t_b = repo.read_tree(&base)?;
    let t_c = repo.read_tree(&c)?;
    let t_o = repo.read_tree(&o)?;

    let (merged_tree, conflicts) = three_way(repo, &t_b, &t_c, &t_o, other_branch)?;

    if !conflicts.is_empty() {
        checkout::materialize(repo, &merged_tree)?;
        tracing::info!(?conflicts, "merge produced conflicts");
        return Ok(MergeOutcome::Conflict { conflicts });
    }

    let tree_id = repo.store.put(&Object::Tree(merged_tree.clone()))?;
    let record = CommitRecord {
        tree: hash::hash_to_hex(&tree_id),
        parents: vec![hash::hash_to_hex(&c), hash::hash_to_hex(&o)],
        author: crate::config::resolve_author(&repo.fangs_dir),
        timestamp: chrono::Utc::now().to_rfc3339(),
        message: format!("Merge branch '{other_branch}'"),
    };
    let commit_id = repo.store.put(&Object::Commit(record))?;
    repo.refs.write_direct(&branch_ref_name(&current_branch), &commit_id)?;
    checkout::materialize(repo, &merged_tree)?;

    tracing::info!(commit = %hash::hash_to_hex(&commit_id), "created merge commit");
    Ok(MergeOutcome::ThreeWay { commit: commit_id })
}

/// Case table from §4.10, applied path by path over the union of all
/// three trees' keys.
fn three_way(repo: &Repository, base: &Tree, current: &Tree, other: &Tree, other_branch: &str) -> Result<(Tree, Vec<String>)> {
    let mut paths: BTreeSet<&str> = BTreeSet::new();
    paths.extend(base.keys().map(String::as_str));
    paths.extend(current.keys().map(String::as_str));
    paths.extend(other.keys().map(String::as_str));

    let mut merged = Tree::new();
    let mut conflicts = Vec::new();

    for path in paths {
        let b = base.get(path);
        let c = current.get(path);
        let o = other.get(path);

        if c == o {
            if let Some(id) = c {
                merged.insert(path.to_string(), id.clone());
            }
            continue;
        }

        if c == b {
            if let Some(id) = o {
                merged.insert(path.to_string(), id.clone());
            }
            continue;
        }

        if o == b {
            if let Some(id) = c {
                merged.insert(path.to_string(), id.clone());
            }
            continue;
        }

        let conflict_id = materialize_conflict_blob(repo, c, o, other_branch)?;
        merged.insert(path.to_string(), hash::hash_to_hex(&conflict_id));
        conflicts.push(path.to_string());
    }

    Ok((merged, conflicts))
}

fn materialize_conflict_blob(repo: &Repository, current_id: Option<&String>, other_id: Option<&String>, other_branch: &str) -> Result<Hash> {
    let current_content = decode_side(repo, current_id)?;
    let other_content = decode_side(repo, other_id)?;

    let mut content = Vec::new();
    content.extend_from_slice(b"<<<<<<< HEAD\n");
    content.extend_from_slice(&current_content);
    content.extend_from_slice(b"=======\n");
    content.extend_from_slice(&other_content);
    content.extend_from_slice(format!(">>>>>>> {other_branch}\n").as_bytes());

    repo.store.put(&Object::Blob(content))
}

fn decode_side(repo: &Repository, id: Option<&String>) -> Result<Vec<u8>> {
    match id {
        None => Ok(Vec::new()),
        Some(id_hex) => {
            let id = hash::hex_to_hash(id_hex)?;
            let mut bytes = repo.store.get(&id, Some(KIND_BLOB))?.try_into_blob()?;
            if !bytes.ends_with(b"\n") {
                bytes.push(b'\n');
            }
            Ok(bytes)
        }
    }
}
