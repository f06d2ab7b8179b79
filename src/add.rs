//! Stage one or more working-tree paths into the index.

use std::path::PathBuf;

use anyhow::Result;

use crate::object::Object;
use crate::repository::Repository;

pub fn add(repo: &Repository, paths: &[PathBuf]) -> Result<()> {
    let _span = tracing::debug_span!("add::add").entered();

    let mut index = repo.load_index()?;

    for path in paths {
        let rel = crate::index::normalize_path(&repo.root, path)?;
        let bytes = std::fs::read(repo.root.join(&rel))?;
        let id = repo.store.put(&Object::Blob(bytes))?;
        index.upsert(&rel, id);
    }

    index.save(&repo.fangs_dir)?;
    tracing::info!(count = paths.len(), "staged paths");
    Ok(())
}
