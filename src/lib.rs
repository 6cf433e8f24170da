//! Repository and object management core for an IPFS desktop client.

pub mod cli;
pub mod commands;
pub mod config;
pub mod daemon;
pub mod download;
pub mod error;
pub mod repo;
pub mod size;

#[cfg(test)]
mod test_support;

pub use config::AppConfig;
pub use daemon::{DaemonConnection, DaemonRpc};
pub use download::{ContentDownloader, DownloadSummary};
pub use error::{RepoError, RepoResult, ERROR_IPFS_UNAVAILABLE};
pub use repo::{GcReport, ObjectStat, PinEntry, RepoStat, RepositoryClient, StorageListAggregator};
pub use size::{format_bytes, HumanSize, SizeUnit};

pub fn run() -> std::process::ExitCode {
    cli::run()
}
