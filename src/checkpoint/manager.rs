use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, Span};

use crate::checkpoint::discovery::{self, Checkpoint};
use crate::checkpoint::model::Checkpointable;
use crate::checkpoint::name::CheckpointName;
use crate::error::CheckpointError;

pub const DEFAULT_STEPS: u64 = 1000;
pub const DEFAULT_MAX_TO_KEEP: usize = 1;

/// Configuration for the checkpoint manager.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheckpointManagerConfig {
    pub checkpoint_dir: PathBuf,
    /// Number of processed steps between checkpoints. Small values can fill the disk.
    pub steps: u64,
    /// Number of checkpoint files kept on disk. Large values can fill the disk.
    pub max_to_keep: usize,
}

impl Default for CheckpointManagerConfig {
    fn default() -> Self {
        CheckpointManagerConfig {
            checkpoint_dir: PathBuf::from("checkpoints"),
            steps: DEFAULT_STEPS,
            max_to_keep: DEFAULT_MAX_TO_KEEP,
        }
    }
}

/// Reject zero for a setting that must be positive.
pub(crate) fn check_positive<T>(name: &str, value: T) -> Result<T, CheckpointError>
where
    T: Copy + PartialEq + Default + fmt::Display,
{
    if value == T::default() {
        return Err(CheckpointError::InvalidArgument(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(value)
}

/// Saves, rotates and restores the checkpoints of one training run.
///
/// The manager keeps an ordered view (oldest first) of the checkpoint files in
/// its directory. [`save`](Self::save) maintains it incrementally; [`load`](Self::load),
/// [`restore`](Self::restore) and [`purge`](Self::purge) rebuild it from a directory scan.
/// A single writer per directory is assumed.
#[derive(Debug)]
pub struct CheckpointManager {
    dir: PathBuf,
    steps: u64,
    max_to_keep: usize,
    file_paths: Vec<PathBuf>,
    count: u64,
    span: Span,
}

impl CheckpointManager {
    /// Create a manager for `dir`, creating the directory tree if needed.
    pub fn new(
        dir: impl AsRef<Path>,
        steps: u64,
        max_to_keep: usize,
    ) -> Result<Self, CheckpointError> {
        let steps = check_positive("steps", steps)?;
        let max_to_keep = check_positive("max_to_keep", max_to_keep)?;
        let dir = std::path::absolute(dir.as_ref())?;
        fs::create_dir_all(&dir)?;

        let span = tracing::info_span!("checkpoint_manager", dir = %dir.display());
        Ok(CheckpointManager {
            dir,
            steps,
            max_to_keep,
            file_paths: Vec::new(),
            count: 0,
            span,
        })
    }

    pub fn from_config(config: &CheckpointManagerConfig) -> Result<Self, CheckpointError> {
        Self::new(&config.checkpoint_dir, config.steps, config.max_to_keep)
    }

    /// Replace the span every operation's events are recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Load the latest checkpoint of the most recent training run under `parent`.
    pub fn from_last_training(parent: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let run_dir = discovery::latest_run_dir(parent.as_ref())?;
        Self::load(run_dir)
    }

    /// Rebuild a manager from an existing checkpoint directory.
    ///
    /// `steps` is taken from the latest checkpoint's name; `max_to_keep` falls
    /// back to [`DEFAULT_MAX_TO_KEEP`].
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let dir = std::path::absolute(dir.as_ref())?;
        let checkpoints = Self::discover(&dir)?;
        let latest = latest_checkpoint(&checkpoints, &dir)?.clone();

        let mut manager = Self::new(&dir, latest.name.steps, DEFAULT_MAX_TO_KEEP)?;
        manager.file_paths = into_paths(checkpoints);
        manager.count = latest.name.count;
        manager.span.in_scope(|| {
            info!(path = %latest.path.display(), count = latest.name.count, "Checkpoint loaded");
        });
        Ok(manager)
    }

    /// Rescan the directory and refresh the in-memory view.
    pub fn restore(&mut self) -> Result<(), CheckpointError> {
        let span = self.span.clone();
        let _guard = span.enter();

        let checkpoints = Self::discover(&self.dir)?;
        let count = latest_checkpoint(&checkpoints, &self.dir)?.name.count;
        self.file_paths = into_paths(checkpoints);
        self.count = count;
        info!(count = self.count, files = self.file_paths.len(), "Checkpoints restored");
        Ok(())
    }

    /// Delete every checkpoint file in the directory and reset the manager.
    ///
    /// Returns the paths that were removed. The first failed deletion aborts the
    /// purge and leaves the in-memory view untouched.
    pub fn purge(&mut self) -> Result<Vec<PathBuf>, CheckpointError> {
        let span = self.span.clone();
        let _guard = span.enter();

        if !self.dir.is_dir() {
            return Err(CheckpointError::NotFound(self.dir.clone()));
        }
        let mut removed = Vec::new();
        for checkpoint in discovery::scan(&self.dir)? {
            if checkpoint.path.is_file() {
                fs::remove_file(&checkpoint.path)?;
                removed.push(checkpoint.path);
            }
        }
        self.file_paths.clear();
        self.count = 0;
        info!(removed = removed.len(), "Checkpoints purged");
        Ok(removed)
    }

    /// Save `model` as the checkpoint for step `count`, evicting the oldest
    /// checkpoints first so at most `max_to_keep` remain.
    ///
    /// If the model fails to save, the manager's view is left unchanged; a
    /// partially written file may remain on disk.
    pub fn save<M: Checkpointable + ?Sized>(
        &mut self,
        model: &M,
        count: u64,
    ) -> Result<PathBuf, CheckpointError> {
        let span = self.span.clone();
        let _guard = span.enter();

        if !self.file_paths.is_empty() && count <= self.count {
            return Err(CheckpointError::InvalidArgument(format!(
                "count {count} must exceed the latest checkpoint count {}",
                self.count
            )));
        }

        let path = self.dir.join(CheckpointName::new(self.steps, count).file_name());
        while self.file_paths.len() >= self.max_to_keep {
            self.evict_oldest()?;
        }

        model
            .save(&path)
            .map_err(|source| CheckpointError::PersistenceFailure {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), count, "Checkpoint saved");

        self.file_paths.push(path.clone());
        self.count = count;
        Ok(path)
    }

    /// Load the most recent checkpoint into `model`.
    pub fn populate<M: Checkpointable + ?Sized>(
        &self,
        model: &mut M,
    ) -> Result<(), CheckpointError> {
        let _guard = self.span.enter();

        let latest = self.latest().ok_or(CheckpointError::NotRestored)?;
        model
            .load(latest)
            .map_err(|source| CheckpointError::PersistenceFailure {
                path: latest.to_path_buf(),
                source,
            })?;
        info!(path = %latest.display(), count = self.count, "Model populated from checkpoint");
        Ok(())
    }

    /// [`restore`](Self::restore) followed by [`populate`](Self::populate).
    pub fn restore_and_populate<M: Checkpointable + ?Sized>(
        &mut self,
        model: &mut M,
    ) -> Result<(), CheckpointError> {
        self.restore()?;
        self.populate(model)
    }

    /// Whether step `count` falls on the configured cadence.
    pub fn is_due(&self, count: u64) -> bool {
        count > 0 && count % self.steps == 0
    }

    pub fn set_steps(&mut self, steps: u64) -> Result<(), CheckpointError> {
        self.steps = check_positive("steps", steps)?;
        Ok(())
    }

    pub fn set_max_to_keep(&mut self, max_to_keep: usize) -> Result<(), CheckpointError> {
        self.max_to_keep = check_positive("max_to_keep", max_to_keep)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn max_to_keep(&self) -> usize {
        self.max_to_keep
    }

    /// Step of the last checkpoint saved or loaded; 0 when nothing is tracked.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Tracked checkpoint files, oldest first.
    pub fn file_paths(&self) -> &[PathBuf] {
        &self.file_paths
    }

    pub fn latest(&self) -> Option<&Path> {
        self.file_paths.last().map(PathBuf::as_path)
    }

    fn discover(dir: &Path) -> Result<Vec<Checkpoint>, CheckpointError> {
        if !dir.is_dir() {
            return Err(CheckpointError::NotFound(dir.to_path_buf()));
        }
        discovery::scan(dir)
    }

    /// Delete the oldest tracked checkpoint. The entry only leaves the list once
    /// the file is gone; a file that is already missing is an error.
    fn evict_oldest(&mut self) -> Result<(), CheckpointError> {
        let oldest = &self.file_paths[0];
        fs::remove_file(oldest)?;
        debug!(path = %oldest.display(), "Evicted checkpoint");
        self.file_paths.remove(0);
        Ok(())
    }
}

fn latest_checkpoint<'a>(
    checkpoints: &'a [Checkpoint],
    dir: &Path,
) -> Result<&'a Checkpoint, CheckpointError> {
    checkpoints
        .last()
        .ok_or_else(|| CheckpointError::NotFound(dir.to_path_buf()))
}

fn into_paths(checkpoints: Vec<Checkpoint>) -> Vec<PathBuf> {
    checkpoints.into_iter().map(|c| c.path).collect()
}
