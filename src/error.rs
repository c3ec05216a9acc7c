use std::path::PathBuf;

use crate::checkpoint::ModelError;

/// Errors that can occur during checkpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("checkpoints not found in {0}, training must start from scratch")]
    NotFound(PathBuf),

    #[error("malformed checkpoint name {path}: {reason}")]
    CorruptCheckpointName { path: PathBuf, reason: String },

    #[error("cannot populate the model, restore a checkpoint first")]
    NotRestored,

    #[error("model persistence failed for {path}: {source}")]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = CheckpointError::NotFound(PathBuf::from("runs/a"));
        assert_eq!(
            err.to_string(),
            "checkpoints not found in runs/a, training must start from scratch"
        );
    }

    #[test]
    fn test_corrupt_name_display() {
        let err = CheckpointError::CorruptCheckpointName {
            path: PathBuf::from("checkpoint-abc-10"),
            reason: "steps field 'abc' is not an integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed checkpoint name checkpoint-abc-10: steps field 'abc' is not an integer"
        );
    }

    #[test]
    fn test_persistence_failure_keeps_source() {
        use std::error::Error;

        let err = CheckpointError::PersistenceFailure {
            path: PathBuf::from("checkpoint-1-2"),
            source: "disk full".into(),
        };
        assert_eq!(
            err.to_string(),
            "model persistence failed for checkpoint-1-2: disk full"
        );
        assert_eq!(err.source().unwrap().to_string(), "disk full");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("checkpoint.steps must be positive, got 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: checkpoint.steps must be positive, got 0"
        );
    }
}
