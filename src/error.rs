//! Error types for gmail-inbox-stats

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gmail API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the failure came from a rejected or missing credential.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a single message did not contribute to the tally.
///
/// Both variants are recovered locally by the pipeline.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("client error: {0}")]
    Client(#[from] Error),

    #[error("message has no From header")]
    NoSender,
}

/// Failures that abort a run before any message is fetched.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("authentication failed: {0}")]
    Auth(#[source] Error),

    #[error("collecting messages failed: {0}")]
    Collection(#[source] Error),
}

impl PipelineError {
    /// Classify a listing failure as an auth or a collection error.
    #[must_use]
    pub fn from_listing(err: Error) -> Self {
        if err.is_auth() {
            Self::Auth(err)
        } else {
            Self::Collection(err)
        }
    }
}
