//! Human-facing status report: colorized sections built from
//! `workspace::collect_status`'s buckets.

use std::io::IsTerminal;

use anyhow::Result;

use crate::refs::Resolved;
use crate::repository::Repository;
use crate::workspace;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub fn status(repo: &Repository) -> Result<()> {
    let index = repo.load_index()?;

    let head_tree = match repo.refs.resolve("HEAD")? {
        Resolved::Id(id) => Some(repo.read_tree(&id)?),
        Resolved::Unborn => None,
    };

    let report = workspace::collect_status(&repo.root, repo.metadata_dir_name(), &index, head_tree.as_ref())?;

    let color = std::io::stdout().is_terminal();
    let paint = |c: &str, s: &str| if color { format!("{c}{s}{RESET}") } else { s.to_string() };

    if let Some(branch) = repo.current_branch()? {
        println!("On branch {branch}");
    } else {
        println!("HEAD detached");
    }

    print_staged_section(
        &paint(BOLD, "Changes to be committed:"),
        &[
            (&report.staged_new, paint(GREEN, "new file:   ")),
            (&report.staged_modified, paint(GREEN, "modified:   ")),
            (&report.staged_deleted, paint(GREEN, "deleted:    ")),
        ],
    );
    print_staged_section(
        &paint(BOLD, "Changes not staged for commit:"),
        &[
            (&report.unstaged_modified, paint(RED, "modified:   ")),
            (&report.unstaged_deleted, paint(RED, "deleted:    ")),
        ],
    );

    if !report.untracked.is_empty() {
        println!("{}", paint(BOLD, "Untracked files:"));
        for path in report.untracked.iter().take(50) {
            println!("  {}", paint(YELLOW, path));
        }
        if report.untracked.len() > 50 {
            println!("  ... and {} more", report.untracked.len() - 50);
        }
    }

    if report.staged_new.is_empty()
        && report.staged_modified.is_empty()
        && report.staged_deleted.is_empty()
        && report.unstaged_modified.is_empty()
        && report.unstaged_deleted.is_empty()
        && report.untracked.is_empty()
    {
        println!("nothing to commit, working tree clean");
    }

    Ok(())
}

fn print_staged_section(header: &str, buckets: &[(&Vec<String>, String)]) {
    if buckets.iter().all(|(paths, _)| paths.is_empty()) {
        return;
    }
    println!("{header}");
    for (paths, label) in buckets {
        for path in paths.iter() {
            println!("  {label}{path}");
        }
    }
}
