//! Input resolution: turn the path argument into the list of files to process

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolve `path` into the files a run will visit.
///
/// A plain file resolves to itself, unless `recursive` is set, which is only
/// meaningful for directories and is rejected. A directory resolves to its
/// files, sorted by name: only the top level by default, every level when
/// `recursive` is set.
pub fn resolve_targets(path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to get info: {}", path.display()))?;

    if !metadata.is_dir() {
        if recursive {
            anyhow::bail!("recursive mode is only available for directories");
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let files = if recursive {
        load_files_recursive(path)
            .with_context(|| format!("failed to load files recursively: {}", path.display()))?
    } else {
        load_files_from_dir(path)
            .with_context(|| format!("failed to load files from dir: {}", path.display()))?
    };

    tracing::debug!("Resolved {} file(s) under {}", files.len(), path.display());
    Ok(files)
}

/// Every non-directory entry below `dir`, depth first, in name order.
fn load_files_recursive(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.context("failed to walk dir")?;
        if entry.file_type().is_dir() {
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

/// Non-directory entries directly inside `dir`, in name order.
fn load_files_from_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        entries.push(entry?);
    }
    entries.sort_by_key(|entry| entry.file_name());

    let mut files = Vec::new();
    for entry in entries {
        if entry.file_type()?.is_dir() {
            continue;
        }
        files.push(entry.path());
    }

    Ok(files)
}
