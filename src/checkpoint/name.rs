use std::fmt;
use std::path::Path;

use crate::error::CheckpointError;

/// Literal tag every checkpoint file name starts with.
pub const CHECKPOINT_TAG: &str = "checkpoint";

/// Separator between the tag, `steps` and `count`. The tag must not contain it.
pub const SEPARATOR: char = '-';

/// The `(steps, count)` pair encoded in a checkpoint file name,
/// e.g. `checkpoint-1000-42000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckpointName {
    pub steps: u64,
    pub count: u64,
}

impl CheckpointName {
    pub fn new(steps: u64, count: u64) -> Self {
        CheckpointName { steps, count }
    }

    /// File name for this checkpoint, without extension.
    pub fn file_name(&self) -> String {
        self.to_string()
    }

    /// Whether a file name looks like a checkpoint and should be parsed.
    pub fn is_candidate(file_name: &str) -> bool {
        file_name.contains(&format!("{CHECKPOINT_TAG}{SEPARATOR}"))
    }

    /// Parse the name of the file at `path`.
    ///
    /// Fields 1 and 2 after splitting on [`SEPARATOR`] are `steps` and `count`;
    /// anything after them is ignored.
    pub fn parse(path: &Path) -> Result<Self, CheckpointError> {
        let corrupt = |reason: String| CheckpointError::CorruptCheckpointName {
            path: path.to_path_buf(),
            reason,
        };

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| corrupt("file name is not valid UTF-8".to_string()))?;

        let mut fields = file_name.split(SEPARATOR).skip(1);
        let mut field = |label: &str| -> Result<u64, CheckpointError> {
            let raw = fields
                .next()
                .ok_or_else(|| corrupt(format!("missing {label} field")))?;
            raw.parse::<u64>()
                .map_err(|_| corrupt(format!("{label} field '{raw}' is not an integer")))
        };

        let steps = field("steps")?;
        let count = field("count")?;
        Ok(CheckpointName { steps, count })
    }
}

impl fmt::Display for CheckpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{CHECKPOINT_TAG}{SEPARATOR}{}{SEPARATOR}{}",
            self.steps, self.count
        )
    }
}
