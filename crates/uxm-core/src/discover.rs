//! # Component Discovery
//!
//! Finds component records (`*.uxm`) in a directory. Results are sorted by
//! path so every consumer processes files in a deterministic order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::component::COMPONENT_EXTENSION;

fn is_component_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|e| e == COMPONENT_EXTENSION)
}

/// Component files directly inside `dir`, sorted by path.
///
/// # Errors
///
/// Returns the IO error if `dir` cannot be listed.
pub fn discover_components(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_component_file(&path) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Component files anywhere under `dir`, sorted by path.
///
/// Symlinked directories are followed, but each directory is walked once
/// by canonical path, so links back into the tree add nothing. Unreadable
/// subdirectories are logged and skipped.
///
/// # Errors
///
/// Returns the IO error if `dir` itself cannot be listed.
pub fn discover_components_recursive(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    // Fail loudly on the root; only nested failures are tolerated.
    std::fs::read_dir(dir)?;
    let mut found = Vec::new();
    let mut visited = HashSet::new();
    walk(dir, &mut found, &mut visited);
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, acc: &mut Vec<PathBuf>, visited: &mut HashSet<PathBuf>) {
    let canonical = match dir.canonicalize() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to resolve directory");
            return;
        }
    };
    if !visited.insert(canonical) {
        tracing::debug!(dir = %dir.display(), "directory already walked");
        return;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "failed to read directory during component walk"
            );
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            walk(&path, acc, visited);
        } else if is_component_file(&path) {
            acc.push(path);
        }
    }
}
