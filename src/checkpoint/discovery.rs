//! Directory scanning shared by every operation that rebuilds state from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::checkpoint::name::CheckpointName;
use crate::error::CheckpointError;

/// A checkpoint file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub path: PathBuf,
    pub name: CheckpointName,
}

/// List all checkpoint files in `dir`, sorted ascending by count.
///
/// Only regular files whose name contains the checkpoint tag are considered.
/// A single malformed name fails the whole scan. Equal counts are ordered by
/// file name so the result does not depend on directory iteration order.
pub fn scan(dir: &Path) -> Result<Vec<Checkpoint>, CheckpointError> {
    let mut checkpoints = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if !CheckpointName::is_candidate(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let name = CheckpointName::parse(&path)?;
        checkpoints.push(Checkpoint { path, name });
    }
    checkpoints.sort_by(|a, b| {
        a.name
            .count
            .cmp(&b.name.count)
            .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
    });
    Ok(checkpoints)
}

/// Pick the most recent training run under `parent`.
///
/// Run directories are expected to sort chronologically by name (for example
/// with a timestamp prefix); the lexicographically greatest entry wins.
pub fn latest_run_dir(parent: &Path) -> Result<PathBuf, CheckpointError> {
    if !parent.is_dir() {
        return Err(CheckpointError::NotFound(parent.to_path_buf()));
    }
    let mut names = fs::read_dir(parent)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<Result<Vec<_>, _>>()?;
    names.sort();
    let latest = names
        .pop()
        .ok_or_else(|| CheckpointError::NotFound(parent.to_path_buf()))?;
    Ok(std::path::absolute(parent.join(latest))?)
}
