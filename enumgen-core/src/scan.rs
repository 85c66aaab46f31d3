//! Parallel, deterministic Go file discovery with directory pruning.
//!
//! Mirrors the `./...` pattern of the Go tool:
//! - `vendor/` and `testdata/` subtrees are skipped
//! - directories and files starting with `.` or `_` are skipped
//! - the walk root itself is never pruned, whatever its name
//!
//! Only `.go` files are returned; build constraints are applied later by the
//! loader.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{EnumgenError, EnumgenResult};

/// Directory names the Go tool excludes from `./...`.
const EXCLUDED_DIRS: &[&str] = &["vendor", "testdata"];

/// Whether a path component is hidden from the Go tool (`.git`, `_obsolete`).
#[inline]
fn is_ignored_name(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

/// Checks if a directory entry should be pruned from the walk.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name) || is_ignored_name(name))
}

/// Whether a file is a Go source file the Go tool would consider.
#[inline]
pub fn is_go_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| !is_ignored_name(name))
}

/// Whether a file name marks a test file.
#[inline]
pub fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.ends_with("_test.go"))
}

/// Gathers all Go files under `root`, recursively.
///
/// Sorted by path so callers see the same order on every run.
pub fn gather_go_files(root: &Path) -> EnumgenResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(EnumgenError::load(root, "not a directory"));
    }

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && is_go_source(path) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                Some(Err(EnumgenError::load(path, e.to_string())))
            }
        })
        .collect::<EnumgenResult<Vec<_>>>()?;

    files.sort();
    Ok(files)
}

/// Lists the Go files directly inside `dir`, without recursion.
///
/// Used for packages pulled in through imports.
pub fn gather_package_files(dir: &Path) -> EnumgenResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| EnumgenError::load(dir, e.to_string()))?;
        if entry.file_type().is_file() && is_go_source(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
