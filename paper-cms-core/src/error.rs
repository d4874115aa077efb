//! Error type shared by every stage of the document pipeline.

use std::path::PathBuf;

/// Result alias used across the crate.
pub type Result<T, E = PaperError> = std::result::Result<T, E>;

/// Everything that can abort a pipeline run.
///
/// None of these are recovered from locally: a single failed request or write
/// surfaces to the caller and ends the run.
#[derive(Debug, thiserror::Error)]
pub enum PaperError {
    /// The API answered with a non-success status. The message is the raw body.
    #[error("{body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (connect failure, timeout, ...).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid request to {endpoint}: {reason}")]
    InvalidRequest { endpoint: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("folder path of depth {depth} has no section folder")]
    NoSection { depth: usize },

    #[error("section name {section:?} cannot be used as a directory name")]
    InvalidSection { section: String },

    #[error("title {title:?} does not produce a file name")]
    MissingTitle { title: String },

    #[error("documents {first} and {second} both resolve to {}", location.display())]
    SlugCollision {
        location: PathBuf,
        first: String,
        second: String,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl PaperError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PaperError::Io {
            path: path.into(),
            source,
        }
    }
}
