use std::path::PathBuf;

use thiserror::Error;

/// Failures while fetching a vocabulary. Never surfaced to the player:
/// the word provider falls back to its backup list.
#[derive(Error, Debug)]
pub enum WordError {
    #[error("vocabulary '{0}' is not bundled")]
    MissingBundle(String),

    #[error("bundled vocabulary '{0}' is not valid UTF-8")]
    Encoding(String),

    #[error("failed to read word file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse word list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("word list contains no usable words")]
    Empty,
}

/// High-score store failures. Reads degrade to 0, writes are dropped.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("high score database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to prepare high score directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored high score '{0}' is not a number")]
    Corrupt(String),
}

/// Feedback playback failures, ignored by the engine.
#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("feedback output failed: {0}")]
    Io(#[from] std::io::Error),
}
