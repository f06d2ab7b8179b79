//! The staged tree: `<40-hex> <path>\n` per line, rewritten atomically.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::hash::{self, Hash};
use crate::object::Tree;

#[derive(Debug, Clone, Default)]
pub struct Index {
    // path -> id, kept sorted so `entries()` and `as_flat_tree()` are
    // deterministic without a separate sort step.
    entries: BTreeMap<String, Hash>,
}

fn index_path(fangs_dir: &Path) -> PathBuf {
    fangs_dir.join("index")
}

impl Index {
    /// Load the index from disk, or an empty index if none exists yet.
    pub fn load(fangs_dir: &Path) -> Result<Self> {
        let path = index_path(fangs_dir);
        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = BTreeMap::new();
        for line in content.lines() {
            let Some((id_str, path_str)) = line.split_once(char::is_whitespace) else {
                bail!("corrupt index line: '{line}'");
            };
            entries.insert(path_str.to_string(), hash::hex_to_hash(id_str)?);
        }

        Ok(Self { entries })
    }

    /// Replace the row for `path` if present, else append it. Callers must
    /// `save` to persist; this only mutates the in-memory map.
    pub fn upsert(&mut self, path: &str, id: Hash) {
        self.entries.insert(path.to_string(), id);
    }

    /// Returns whether a row was actually removed.
    pub fn remove(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Hash> {
        self.entries.get(path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ordered `(path, id)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Hash)> {
        self.entries.iter().map(|(p, h)| (p.as_str(), h))
    }

    #[must_use]
    pub fn as_flat_tree(&self) -> Tree {
        self.entries
            .iter()
            .map(|(path, id)| (path.clone(), hash::hash_to_hex(id)))
            .collect()
    }

    /// Rewrite the whole index file in one shot: write to a temp sibling,
    /// then rename over the real path. Never touched incrementally.
    pub fn save(&self, fangs_dir: &Path) -> Result<()> {
        let path = index_path(fangs_dir);
        let mut buf = String::new();
        for (p, id) in &self.entries {
            buf.push_str(&hash::hash_to_hex(id));
            buf.push(' ');
            buf.push_str(p);
            buf.push('\n');
        }

        let dir = path.parent().expect("index path always has a parent");
        let tmp = dir.join("index.temp");
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(buf.as_bytes())?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Normalize a filesystem path to a repository-relative, forward-slash
/// path. Fails with an error if `path` escapes `repo_root`.
pub fn normalize_path(repo_root: &Path, path: &Path) -> Result<String> {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let rel = abs
        .strip_prefix(repo_root)
        .map_err(|_| crate::error::FangsError::InvalidPath(path.to_path_buf()))?;

    let normalized = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        return Err(crate::error::FangsError::InvalidPath(path.to_path_buf()).into());
    }

    Ok(normalized)
}
