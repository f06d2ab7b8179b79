use std::collections::BTreeMap;

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::hash::{self, Hash};

pub const KIND_BLOB: &str = "blob";
pub const KIND_TREE: &str = "tree";
pub const KIND_COMMIT: &str = "commit";

/// A flat path -> blob-id mapping. Keys are repository-relative,
/// forward-slash-separated paths; the `BTreeMap` keeps them in
/// lexicographic order so encoding is canonical by construction.
pub type Tree = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub tree: String,
    pub parents: Vec<String>,
    pub author: String,
    pub timestamp: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Vec<u8>),
    Tree(Tree),
    Commit(CommitRecord),
}

impl Object {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Blob(_) => KIND_BLOB,
            Self::Tree(_) => KIND_TREE,
            Self::Commit(_) => KIND_COMMIT,
        }
    }

    /// Canonical payload bytes: raw bytes for blobs, canonical JSON for
    /// trees and commits. The same encoding is used for hashing and for
    /// decoding, per the canonicality invariant.
    pub fn payload(&self) -> Result<Vec<u8>> {
        match self {
            Self::Blob(bytes) => Ok(bytes.clone()),
            Self::Tree(tree) => Ok(serde_json::to_vec(tree)?),
            Self::Commit(record) => Ok(serde_json::to_vec(record)?),
        }
    }

    /// The full `"<kind> <len>\0<payload>"` byte sequence hashed to
    /// derive this object's identifier.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(hash::canonical_bytes(self.kind(), &self.payload()?))
    }

    pub fn id(&self) -> Result<Hash> {
        Ok(hash::hash_bytes(&self.canonical_bytes()?))
    }

    /// Parse an object from its on-disk canonical bytes, verifying the
    /// header against `expected_kind` when given.
    pub fn decode(bytes: &[u8], expected_kind: Option<&str>) -> Result<Self> {
        let nul = bytes
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| anyhow!("corrupt object: missing header terminator"))?;
        let header = std::str::from_utf8(&bytes[..nul])?;
        let mut parts = header.splitn(2, ' ');
        let kind = parts.next().ok_or_else(|| anyhow!("corrupt object: missing kind"))?;
        let len_str = parts.next().ok_or_else(|| anyhow!("corrupt object: missing length"))?;
        let len: usize = len_str.parse().map_err(|_| anyhow!("corrupt object: bad length '{len_str}'"))?;

        if let Some(expected) = expected_kind {
            if kind != expected {
                return Err(crate::error::FangsError::TypeMismatch {
                    expected: expected.to_string(),
                    found: kind.to_string(),
                }
                .into());
            }
        }

        let payload = &bytes[nul + 1..];
        if payload.len() != len {
            return Err(crate::error::FangsError::CorruptObject(
                header.to_string(),
                format!("declared length {len} does not match payload length {}", payload.len()),
            )
            .into());
        }

        match kind {
            KIND_BLOB => Ok(Self::Blob(payload.to_vec())),
            KIND_TREE => Ok(Self::Tree(serde_json::from_slice(payload)?)),
            KIND_COMMIT => Ok(Self::Commit(serde_json::from_slice(payload)?)),
            other => bail!("corrupt object: unknown kind '{other}'"),
        }
    }

    pub fn try_into_blob(self) -> Result<Vec<u8>> {
        match self {
            Self::Blob(b) => Ok(b),
            other => bail!("expected blob, found {}", other.kind()),
        }
    }

    pub fn try_into_tree(self) -> Result<Tree> {
        match self {
            Self::Tree(t) => Ok(t),
            other => bail!("expected tree, found {}", other.kind()),
        }
    }

    pub fn try_into_commit(self) -> Result<CommitRecord> {
        match self {
            Self::Commit(c) => Ok(c),
            other => bail!("expected commit, found {}", other.kind()),
        }
    }

    pub fn as_blob(&self) -> Result<&[u8]> {
        match self {
            Self::Blob(b) => Ok(b),
            other => bail!("expected blob, found {}", other.kind()),
        }
    }

    pub fn as_tree(&self) -> Result<&Tree> {
        match self {
            Self::Tree(t) => Ok(t),
            other => bail!("expected tree, found {}", other.kind()),
        }
    }

    pub fn as_commit(&self) -> Result<&CommitRecord> {
        match self {
            Self::Commit(c) => Ok(c),
            other => bail!("expected commit, found {}", other.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_roundtrip() {
        let obj = Object::Blob(b"hello".to_vec());
        let id = obj.id().unwrap();
        let bytes = obj.canonical_bytes().unwrap();
        let decoded = Object::decode(&bytes, Some(KIND_BLOB)).unwrap();
        assert_eq!(decoded, obj);
        assert_eq!(hash::hash_bytes(&bytes), id);
    }

    #[test]
    fn tree_is_canonical_regardless_of_insertion_order() {
        let mut a = Tree::new();
        a.insert("b.txt".into(), "id-b".into());
        a.insert("a.txt".into(), "id-a".into());

        let mut b = Tree::new();
        b.insert("a.txt".into(), "id-a".into());
        b.insert("b.txt".into(), "id-b".into());

        let oa = Object::Tree(a);
        let ob = Object::Tree(b);
        assert_eq!(oa.canonical_bytes().unwrap(), ob.canonical_bytes().unwrap());
        assert_eq!(oa.id().unwrap(), ob.id().unwrap());
    }

    #[test]
    fn commit_roundtrip() {
        let record = CommitRecord {
            tree: "a".repeat(40),
            parents: vec![],
            author: "me".into(),
            timestamp: "2026-07-26T00:00:00Z".into(),
            message: "m1".into(),
        };
        let obj = Object::Commit(record.clone());
        let bytes = obj.canonical_bytes().unwrap();
        let decoded = Object::decode(&bytes, Some(KIND_COMMIT)).unwrap();
        assert_eq!(decoded.try_into_commit().unwrap(), record);
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let obj = Object::Blob(b"x".to_vec());
        let bytes = obj.canonical_bytes().unwrap();
        assert!(Object::decode(&bytes, Some(KIND_TREE)).is_err());
    }

    #[test]
    fn truncated_payload_is_corrupt() {
        let obj = Object::Blob(b"hello".to_vec());
        let mut bytes = obj.canonical_bytes().unwrap();
        bytes.truncate(bytes.len() - 1);
        assert!(Object::decode(&bytes, None).is_err());
    }
}
