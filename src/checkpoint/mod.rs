pub mod discovery;
mod manager;
mod model;
mod name;

pub use discovery::Checkpoint;
pub use manager::{
    CheckpointManager, CheckpointManagerConfig, DEFAULT_MAX_TO_KEEP, DEFAULT_STEPS,
};
pub(crate) use manager::check_positive;
pub use model::{Checkpointable, ModelError};
pub use name::{CheckpointName, CHECKPOINT_TAG, SEPARATOR};
