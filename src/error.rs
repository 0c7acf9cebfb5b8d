use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the persistence boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access storage slot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("storage slot is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}

/// An unrecognized name for one of the model enumerations.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseNameError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        ParseNameError { kind, value: value.to_string() }
    }
}
