//! Source file collection: directories in, analyzable files out.
//!
//! Directories are walked with the `ignore` crate, so `.gitignore` rules and
//! `.git` directories are honored the same way git itself does. Explicitly
//! listed files bypass the walker but still pass the language filter and the
//! exclude list.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::warn;

use crate::error::Result;
use crate::gsg::Language;

/// Collect source files from `inputs` (files or directories).
///
/// `filter` restricts to the given languages (empty = all supported);
/// `excludes` removes files and whole directory subtrees. The result is
/// sorted, so repeated runs see the same order.
pub fn collect_source_files(
    inputs: &[PathBuf],
    filter: &[Language],
    excludes: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let excludes: Vec<PathBuf> = excludes.iter().map(|e| normalize(e)).collect();
    let mut out = Vec::new();

    for input in inputs {
        if input.is_dir() {
            collect_dir(input, filter, &excludes, &mut out);
        } else if input.is_file() {
            if !is_excluded(input, &excludes) && wanted(input, filter) {
                out.push(input.clone());
            }
        } else {
            warn!(path = %input.display(), "input does not exist, skipping");
        }
    }

    out.sort();
    out.dedup();
    Ok(out)
}

fn collect_dir(dir: &Path, filter: &[Language], excludes: &[PathBuf], out: &mut Vec<PathBuf>) {
    let walker = WalkBuilder::new(dir)
        .hidden(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "walk error");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if is_excluded(path, excludes) || !wanted(path, filter) {
            continue;
        }
        out.push(path.to_path_buf());
    }
}

fn wanted(path: &Path, filter: &[Language]) -> bool {
    let lang = Language::from_path(path);
    if lang == Language::Unknown {
        return false;
    }
    filter.is_empty() || filter.contains(&lang)
}

/// A path is excluded when it or any of its ancestors is on the exclude
/// list.
fn is_excluded(path: &Path, excludes: &[PathBuf]) -> bool {
    if excludes.is_empty() {
        return false;
    }
    let path = normalize(path);
    excludes.iter().any(|ex| path.starts_with(ex))
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
