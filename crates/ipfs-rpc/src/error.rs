use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid daemon endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("daemon rejected {command} ({status}): {message}")]
    Daemon {
        command: String,
        status: u16,
        message: String,
    },

    #[error("daemon reported an error while streaming {command}: {message}")]
    Stream { command: String, message: String },

    #[error("failed to decode {command} response: {source}")]
    Decode {
        command: String,
        source: serde_json::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot add {0}: path has no file name")]
    InvalidPath(PathBuf),
}

pub type RpcResult<T> = Result<T, RpcError>;
