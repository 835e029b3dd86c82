//! Error taxonomy for cover resolution and image materialization
//!
//! Every variant except `Write` is recoverable: the stage that produced it is
//! abandoned and the caller falls through to the next source or strategy.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoverError {
    /// No candidate anywhere (local corpus or remote search)
    #[error("no cover art found for {0}")]
    NotFound(String),

    /// A corpus file is not valid JSON
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Timeout, connection failure or non-success HTTP status
    #[error("network failure for {url}: {reason}")]
    Network { url: String, reason: String },

    /// An external conversion tool is not installed
    #[error("{0} is not installed")]
    ToolUnavailable(&'static str),

    /// A subprocess ran past its deadline and was killed
    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: &'static str, secs: u64 },

    /// Bytes are not a usable image (undecodable, too small, tool failure)
    #[error("decode failed: {0}")]
    Decode(String),

    /// Destination cannot be written
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoverError {
    pub fn network(url: &str, reason: impl ToString) -> Self {
        CoverError::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Terminal failures end the attempt for this game instead of falling through
    pub fn is_terminal(&self) -> bool {
        matches!(self, CoverError::Write { .. })
    }
}

impl From<image::ImageError> for CoverError {
    fn from(e: image::ImageError) -> Self {
        CoverError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for CoverError {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        CoverError::Network {
            url,
            reason: e.to_string(),
        }
    }
}

pub type CoverResult<T> = Result<T, CoverError>;
