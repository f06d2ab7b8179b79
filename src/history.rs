//! Commit DAG traversal: parents, ancestors, merge base.

use std::collections::{HashSet, VecDeque};

use anyhow::Result;

use crate::hash::Hash;
use crate::object::KIND_COMMIT;
use crate::store::Store;

pub fn parents(store: &Store, commit_id: &Hash) -> Result<Vec<Hash>> {
    let commit = store.get(commit_id, Some(KIND_COMMIT))?.try_into_commit()?;
    commit
        .parents
        .iter()
        .map(|s| crate::hash::hex_to_hash(s))
        .collect()
}

/// BFS from `commit_id`, first-parent preferred, each id visited once.
pub struct Ancestors<'a> {
    store: &'a Store,
    queue: VecDeque<Hash>,
    visited: HashSet<Hash>,
}

impl<'a> Ancestors<'a> {
    #[must_use]
    pub fn new(store: &'a Store, commit_id: Hash) -> Self {
        let mut visited = HashSet::new();
        visited.insert(commit_id);
        Self { store, queue: VecDeque::from([commit_id]), visited }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = Hash;

    fn next(&mut self) -> Option<Hash> {
        let id = self.queue.pop_front()?;
        if let Ok(ps) = parents(self.store, &id) {
            for p in ps {
                if self.visited.insert(p) {
                    self.queue.push_back(p);
                }
            }
        }
        Some(id)
    }
}

#[must_use]
pub fn ancestors(store: &Store, commit_id: Hash) -> Ancestors<'_> {
    Ancestors::new(store, commit_id)
}

/// Compute the full ancestor set of `a`, then walk `b`'s ancestors in BFS
/// order and return the first one that lands in `a`'s set.
#[must_use]
pub fn merge_base(store: &Store, a: Hash, b: Hash) -> Option<Hash> {
    let a_ancestors: HashSet<Hash> = ancestors(store, a).collect();
    ancestors(store, b).find(|id| a_ancestors.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{CommitRecord, Object};

    fn commit(store: &Store, tree: &str, parents: Vec<Hash>) -> Hash {
        let record = CommitRecord {
            tree: tree.to_string(),
            parents: parents.iter().map(crate::hash::hash_to_hex).collect(),
            author: "t".into(),
            timestamp: "2026-01-01T00:00:00Z".into(),
            message: "m".into(),
        };
        store.put(&Object::Commit(record)).unwrap()
    }

    #[test]
    fn merge_base_of_self_is_self() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let c1 = commit(&store, &"a".repeat(40), vec![]);
        assert_eq!(merge_base(&store, c1, c1), Some(c1));
    }

    #[test]
    fn merge_base_of_ancestor_is_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let c1 = commit(&store, &"a".repeat(40), vec![]);
        let c2 = commit(&store, &"b".repeat(40), vec![c1]);
        assert_eq!(merge_base(&store, c2, c1), Some(c1));
    }

    #[test]
    fn merge_base_of_diverging_branches() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let base = commit(&store, &"a".repeat(40), vec![]);
        let left = commit(&store, &"b".repeat(40), vec![base]);
        let right = commit(&store, &"c".repeat(40), vec![base]);
        assert_eq!(merge_base(&store, left, right), Some(base));
    }

    #[test]
    fn ancestors_visits_each_commit_once_through_merge() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let base = commit(&store, &"a".repeat(40), vec![]);
        let left = commit(&store, &"b".repeat(40), vec![base]);
        let right = commit(&store, &"c".repeat(40), vec![base]);
        let merge = commit(&store, &"d".repeat(40), vec![left, right]);

        let all: Vec<Hash> = ancestors(&store, merge).collect();
        assert_eq!(all.len(), 4);
        let unique: HashSet<Hash> = all.into_iter().collect();
        assert_eq!(unique.len(), 4);
    }
}
