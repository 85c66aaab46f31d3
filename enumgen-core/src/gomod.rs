//! Go module detection.
//!
//! Finds the `go.mod` enclosing a directory and maps import paths of that
//! module onto directories, so that types declared in sibling packages can
//! be resolved. Imports from other modules or the standard library are left
//! unresolved.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EnumgenResult, IoResultExt};

/// A Go module: its root directory and `module` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub root: PathBuf,
    pub path: String,
}

impl GoModule {
    /// Maps an import path to a directory inside this module.
    pub fn dir_for_import(&self, import: &str) -> Option<PathBuf> {
        if import == self.path {
            return Some(self.root.clone());
        }
        let rest = import.strip_prefix(&self.path)?.strip_prefix('/')?;
        if rest.is_empty() {
            return None;
        }
        let mut dir = self.root.clone();
        for part in rest.split('/') {
            dir.push(part);
        }
        Some(dir)
    }
}

/// Extracts the module path from `go.mod` contents.
pub fn parse_module_path(go_mod: &str) -> Option<String> {
    for line in go_mod.lines() {
        let line = match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        };
        let Some(rest) = line.trim().strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) && !rest.starts_with('"') {
            continue;
        }
        let path = rest.trim().trim_matches('"').trim_matches('`');
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }
    None
}

/// Finds the module enclosing `dir` by walking up to the nearest `go.mod`.
///
/// Returns `Ok(None)` when there is no `go.mod`, or when it has no `module`
/// directive.
pub fn find_module(dir: &Path) -> EnumgenResult<Option<GoModule>> {
    let mut current = Some(dir);
    while let Some(candidate) = current {
        let go_mod = candidate.join("go.mod");
        if go_mod.is_file() {
            let text = fs::read_to_string(&go_mod).with_path(&go_mod)?;
            return Ok(parse_module_path(&text).map(|path| GoModule {
                root: candidate.to_path_buf(),
                path,
            }));
        }
        current = candidate.parent();
    }
    Ok(None)
}
