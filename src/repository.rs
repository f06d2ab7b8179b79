use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::hash::Hash;
use crate::index::Index;
use crate::object::{KIND_COMMIT, Tree};
use crate::refs::{RefStore, Ref, Resolved, branch_ref_name};
use crate::store::Store;

pub const FANGS_DIR_NAME: &str = "fangs";
pub const INITIAL_BRANCH: &str = "master";

pub struct Repository {
    pub root: PathBuf,
    pub fangs_dir: PathBuf,
    pub store: Store,
    pub refs: RefStore,
}

impl Repository {
    #[inline]
    pub fn init(path: &Path) -> Result<Self> {
        let fangs_dir = path.join(FANGS_DIR_NAME);

        std::fs::create_dir_all(&fangs_dir)?;
        std::fs::create_dir_all(fangs_dir.join("objects"))?;
        std::fs::create_dir_all(fangs_dir.join("refs/heads"))?;

        let root = path.canonicalize()?;
        let store = Store::new(&fangs_dir);
        let refs = RefStore::new(&fangs_dir);
        refs.write_symbolic("HEAD", &branch_ref_name(INITIAL_BRANCH))?;

        tracing::debug!(path = %root.display(), "initialized repository");

        Ok(Self { root, fangs_dir, store, refs })
    }

    #[inline]
    pub fn open(path: &Path) -> Result<Self> {
        let fangs_dir = path.join(FANGS_DIR_NAME);

        if !fangs_dir.join("HEAD").exists() {
            bail!("not a fangs repository (no '{FANGS_DIR_NAME}/HEAD' found)");
        }

        let root = path.canonicalize()?;
        Ok(Self {
            store: Store::new(&fangs_dir),
            refs: RefStore::new(&fangs_dir),
            fangs_dir,
            root,
        })
    }

    pub fn load_index(&self) -> Result<Index> {
        Index::load(&self.fangs_dir)
    }

    /// Return current branch name, or `None` if detached.
    pub fn current_branch(&self) -> Result<Option<String>> {
        match self.refs.read("HEAD")? {
            Some(Ref::Symbolic(target)) => Ok(target.strip_prefix("refs/heads/").map(ToString::to_string)),
            Some(Ref::Direct(_)) | None => Ok(None),
        }
    }

    /// Resolve HEAD to a commit id. Fails if HEAD is unborn; callers that
    /// need to tolerate an unborn branch should call `self.refs.resolve`
    /// directly.
    pub fn read_head_commit(&self) -> Result<Hash> {
        match self.refs.resolve("HEAD")? {
            Resolved::Id(id) => Ok(id),
            Resolved::Unborn => bail!("HEAD does not yet point to a commit (no commits on this branch)"),
        }
    }

    /// Resolve a branch name or raw hex id to a commit id.
    pub fn resolve_to_commit(&self, target: &str) -> Result<Hash> {
        let id = if self.refs.branch_exists(target) {
            match self.refs.resolve(&branch_ref_name(target))? {
                Resolved::Id(id) => id,
                Resolved::Unborn => bail!("branch '{target}' has no commits yet"),
            }
        } else {
            crate::hash::hex_to_hash(target)?
        };

        self.store.get(&id, Some(KIND_COMMIT))?;
        Ok(id)
    }

    pub fn read_tree(&self, commit_id: &Hash) -> Result<Tree> {
        let commit = self.store.get(commit_id, Some(KIND_COMMIT))?.try_into_commit()?;
        let tree_id = crate::hash::hex_to_hash(&commit.tree)?;
        self.store.get(&tree_id, Some(crate::object::KIND_TREE))?.try_into_tree()
    }

    pub fn workspace_root(&self) -> &Path {
        &self.root
    }

    pub fn metadata_dir_name(&self) -> &'static str {
        FANGS_DIR_NAME
    }
}
