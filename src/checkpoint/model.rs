use std::path::Path;

/// Error returned by a model's own persistence code. Passed through unchanged
/// inside [`CheckpointError::PersistenceFailure`](crate::error::CheckpointError::PersistenceFailure).
pub type ModelError = Box<dyn std::error::Error + Send + Sync>;

/// A model whose full state can be written to and read back from a single file.
///
/// The manager only decides *where* a snapshot lives; the format is entirely
/// up to the implementor.
pub trait Checkpointable {
    /// Write a complete, loadable snapshot to `path` (absolute).
    fn save(&self, path: &Path) -> Result<(), ModelError>;

    /// Replace the in-memory state with the snapshot stored at `path`.
    fn load(&mut self, path: &Path) -> Result<(), ModelError>;
}
