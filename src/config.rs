//! Author-identity resolution: `FANGS_AUTHOR` env var, then
//! `fangs/config`, then a built-in default.

use std::fs;
use std::path::Path;

const DEFAULT_AUTHOR: &str = "unknown";

#[must_use]
pub fn resolve_author(fangs_dir: &Path) -> String {
    if let Ok(author) = std::env::var("FANGS_AUTHOR") {
        if !author.is_empty() {
            return author;
        }
    }

    if let Some(author) = read_config_author(fangs_dir) {
        return author;
    }

    DEFAULT_AUTHOR.to_string()
}

fn read_config_author(fangs_dir: &Path) -> Option<String> {
    let content = fs::read_to_string(fangs_dir.join("config")).ok()?;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!(line, "skipping malformed config line");
            continue;
        };

        if key.trim() == "author" {
            return Some(value.trim().to_string());
        }
    }

    None
}
