//! Sharded loose-object store: `objects/<first-2-hex>/<remaining-38-hex>`.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::hash::{self, Hash};
use crate::object::Object;

pub struct Store {
    root: PathBuf,
}

impl Store {
    #[inline]
    #[must_use]
    pub fn new(fangs_dir: &Path) -> Self {
        Self { root: fangs_dir.join("objects") }
    }

    fn shard_path(&self, id: &Hash) -> PathBuf {
        let hex = hash::hash_to_hex(id);
        self.root.join(&hex[..2]).join(&hex[2..])
    }

    /// Compute the canonical bytes and id for `object`, then write it if
    /// absent. Idempotent: an existing object at the target path is left
    /// untouched and its id returned without rewriting.
    pub fn put(&self, object: &Object) -> Result<Hash> {
        let bytes = object.canonical_bytes()?;
        let id = hash::hash_bytes(&bytes);
        let path = self.shard_path(&id);

        if path.exists() {
            return Ok(id);
        }

        let dir = path.parent().expect("shard path always has a parent");
        fs::create_dir_all(dir)?;

        let tmp = dir.join(format!(".tmp-{}", std::process::id()));
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(&bytes)?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        Ok(id)
    }

    /// Read and decode the object at `id`, verifying it against
    /// `expected_kind` when given.
    pub fn get(&self, id: &Hash, expected_kind: Option<&str>) -> Result<Object> {
        let path = self.shard_path(id);
        let bytes = fs::read(&path)
            .map_err(|_| crate::error::FangsError::NotFound(hash::hash_to_hex(id)))?;
        Object::decode(&bytes, expected_kind)
    }

    #[must_use]
    pub fn contains(&self, id: &Hash) -> bool {
        self.shard_path(id).exists()
    }
}
