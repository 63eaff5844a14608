// Error types for conbuddy.
// Separates transport failures, remote domain errors, and local cache misses.

use std::path::PathBuf;

use thiserror::Error;

use crate::tte::ApiError;

#[derive(Error, Debug)]
pub enum BuddyError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("unable to load {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no API key: pass --api-key or set TTE_API_KEY")]
    MissingApiKey,

    #[error("no stored session: run `conbuddy login` first")]
    NoSession,

    #[error("no convention matches {0:?}")]
    UnknownConvention(String),

    #[error("{0}")]
    Other(String),
}

impl BuddyError {
    /// Whether this error only means "nothing usable in the local store".
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, BuddyError::NotFound { .. } | BuddyError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, BuddyError>;
