use ipfs_rpc::RpcError;
use std::path::PathBuf;
use thiserror::Error;

/// Sentinel reported whenever an operation runs before the daemon handle exists.
pub const ERROR_IPFS_UNAVAILABLE: &str = "IPFS NOT AVAILABLE";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("IPFS NOT AVAILABLE")]
    DaemonUnavailable,

    #[error("invalid daemon endpoint: {0}")]
    InvalidEndpoint(#[source] RpcError),

    #[error(transparent)]
    Transport(#[from] RpcError),

    #[error("storage list aborted, stat of {hash} failed: {source}")]
    Aggregate {
        hash: String,
        source: Box<RepoError>,
    },

    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("content stream interrupted: {0}")]
    ContentStream(#[source] std::io::Error),

    #[error("refusing to write {0} outside the destination directory")]
    UnsafePath(PathBuf),

    #[error("download worker failed: {0}")]
    Worker(String),
}

impl RepoError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, RepoError::DaemonUnavailable)
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> RepoError {
        let path = path.into();
        move |source| RepoError::Filesystem { path, source }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
