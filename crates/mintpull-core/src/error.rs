use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PullError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to read mint list {path}: {reason}")]
    Input { path: PathBuf, reason: String },
    #[error("failed to create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("metadata service responded with {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },
    #[error("failed to decode metadata response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode JSON: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("{0}")]
    UpstreamRecord(String),
    #[error("asset request responded with {0}")]
    AssetStatus(StatusCode),
    #[error("offchain metadata has no image URL")]
    MissingImage,
}

impl PullError {
    pub fn config<T: Into<String>>(message: T) -> Self {
        PullError::Config(message.into())
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PullError::Write {
            path: path.into(),
            source,
        }
    }
}
