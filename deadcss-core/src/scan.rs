//! Parallel, deterministic discovery of target files and stylesheets.
//!
//! Performance optimizations:
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Parallel entry filtering via Rayon's `par_bridge`
//! - Results sorted so every run sees files in the same order

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::logging::log_file_failure;

/// Directories to exclude by default.
pub const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules", ".deadcss"];

/// Checks if a directory entry should be pruned (excluded from traversal).
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

#[inline]
fn has_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()))
}

/// Gathers files under `root` whose extension is in `extensions`
/// (case-insensitive, without the leading dot).
///
/// `.git/`, `node_modules/` and `.deadcss/` are always pruned, along with any
/// directory named in `excludes`. An unreadable entry below `root` is logged
/// and skipped; an unreadable `root` is an error.
pub fn gather_files(root: &Path, extensions: &[&str], excludes: &[&str]) -> Result<Vec<PathBuf>> {
    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();
    let wanted: HashSet<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        // CRITICAL: filter_entry prunes entire subtrees before iteration
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && has_extension(path, &wanted) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            // Only a failure on the root itself is fatal
            Err(e) if e.depth() == 0 => Some(Err(e.into())),
            Err(e) => {
                log_file_failure(e.path().unwrap_or(root), &e);
                None
            }
        })
        .collect::<Result<Vec<_>>>()
        .context(format!("Failed to gather files from {}", root.display()))?;

    files.sort();
    Ok(files)
}

/// Gathers markup, template and script files to analyze.
pub fn gather_target_files(root: &Path, extensions: &[&str], excludes: &[&str]) -> Result<Vec<PathBuf>> {
    gather_files(root, extensions, excludes)
}

/// Gathers every `.css` file under `dir`, sorted by path. Stylesheets are
/// merged in this order, so later paths win on selector collisions.
pub fn gather_stylesheets(dir: &Path) -> Result<Vec<PathBuf>> {
    gather_files(dir, &["css"], &[])
}
