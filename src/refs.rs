//! Reference namespace: direct and symbolic refs rooted at `HEAD`.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::FangsError;
use crate::hash::{self, Hash};

const MAX_RESOLVE_DEPTH: usize = 8;
const SYMBOLIC_PREFIX: &str = "ref: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ref {
    Direct(Hash),
    Symbolic(String),
}

/// Outcome of resolving a (possibly symbolic) reference all the way down
/// to a commit id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Id(Hash),
    /// The chain bottoms out at a ref file that does not exist yet.
    Unborn,
}

pub struct RefStore {
    fangs_dir: PathBuf,
}

impl RefStore {
    #[inline]
    #[must_use]
    pub fn new(fangs_dir: &Path) -> Self {
        Self { fangs_dir: fangs_dir.to_path_buf() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        if name == "HEAD" {
            self.fangs_dir.join("HEAD")
        } else {
            self.fangs_dir.join(name)
        }
    }

    /// Read the raw content of `name` without following symbolic chains.
    pub fn read(&self, name: &str) -> Result<Option<Ref>> {
        let path = self.path_for(name);
        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let content = content.trim_end_matches(['\n', '\r']);

        if let Some(target) = content.strip_prefix(SYMBOLIC_PREFIX) {
            Ok(Some(Ref::Symbolic(target.trim().to_string())))
        } else {
            Ok(Some(Ref::Direct(hash::hex_to_hash(content)?)))
        }
    }

    /// Resolve `name` through up to `MAX_RESOLVE_DEPTH` symbolic hops.
    pub fn resolve(&self, name: &str) -> Result<Resolved> {
        let mut current = name.to_string();
        let mut visited = std::collections::HashSet::new();

        for _ in 0..MAX_RESOLVE_DEPTH {
            if !visited.insert(current.clone()) {
                return Err(FangsError::CycleError(current).into());
            }

            match self.read(&current)? {
                None => return Ok(Resolved::Unborn),
                Some(Ref::Direct(id)) => return Ok(Resolved::Id(id)),
                Some(Ref::Symbolic(target)) => current = target,
            }
        }

        Err(FangsError::CycleError(current).into())
    }

    /// Write `id` as a direct reference at `name`, atomically.
    pub fn write_direct(&self, name: &str, id: &Hash) -> Result<()> {
        self.write_raw(name, &format!("{}\n", hash::hash_to_hex(id)))
    }

    /// Write the literal `ref: <target>` at `name`, atomically.
    pub fn write_symbolic(&self, name: &str, target: &str) -> Result<()> {
        self.write_raw(name, &format!("{SYMBOLIC_PREFIX}{target}\n"))
    }

    fn write_raw(&self, name: &str, content: &str) -> Result<()> {
        let path = self.path_for(name);
        let dir = path.parent().expect("ref path always has a parent");
        fs::create_dir_all(dir)?;

        let tmp = dir.join(format!(".tmp-{}", std::process::id()));
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(content.as_bytes())?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Write `commit_id` through whatever `HEAD` currently points to: its
    /// symbolic target if `HEAD` is symbolic, or `HEAD` itself if detached
    /// or unborn.
    pub fn advance_head(&self, commit_id: &Hash) -> Result<()> {
        match self.read("HEAD")? {
            Some(Ref::Symbolic(target)) => self.write_direct(&target, commit_id),
            Some(Ref::Direct(_)) | None => self.write_direct("HEAD", commit_id),
        }
    }

    /// List branch names under `refs/heads/`, sorted.
    pub fn list_branches(&self) -> Result<Vec<String>> {
        let heads_dir = self.fangs_dir.join("refs/heads");
        if !heads_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = fs::read_dir(&heads_dir)?
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|e| e.file_name().into_string().ok())
            .collect::<Vec<_>>();
        names.sort_unstable();
        Ok(names)
    }

    #[must_use]
    pub fn branch_exists(&self, name: &str) -> bool {
        self.fangs_dir.join("refs/heads").join(name).exists()
    }

    pub fn remove_branch(&self, name: &str) -> Result<()> {
        fs::remove_file(self.fangs_dir.join("refs/heads").join(name))?;
        Ok(())
    }
}

#[must_use]
pub fn branch_ref_name(branch: &str) -> String {
    format!("refs/heads/{branch}")
}
