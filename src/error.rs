use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a key-value store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("store file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum TaskListError {
    #[error("failed to read tasks: {0}")]
    Load(#[source] StoreError),

    #[error("failed to decode stored tasks: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to write tasks: {0}")]
    Save(#[source] StoreError),

    #[error("failed to encode tasks: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("logging setup: {0}")]
    Logging(String),
}

impl TaskListError {
    /// Load and decode problems both count as a failed startup load.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Decode(_))
    }

    pub fn is_save_failure(&self) -> bool {
        matches!(self, Self::Save(_) | Self::Encode(_))
    }
}

pub type Result<T> = std::result::Result<T, TaskListError>;
