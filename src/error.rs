use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriftError {
    #[error(transparent)]
    Stage(#[from] crate::pipeline::StageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid resource at index {index}: {reason}")]
    InvalidResource { index: usize, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}
