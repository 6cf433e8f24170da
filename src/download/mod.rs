//! Content download module
//!
//! Streams an object's content tree from the daemon to a local directory:
//! - The daemon's tar stream is pulled lazily, record by record
//! - File contents are copied in chunks, never buffered whole
//! - Each destination file is closed before the next record is read

mod types;
mod worker;

use log::info;
use std::path::Path;

use crate::error::{RepoError, RepoResult};
use crate::repo::RepositoryClient;

pub use types::{DownloadSummary, FileRecord};
pub use worker::{archive_records, write_records};

#[derive(Debug, Clone)]
pub struct ContentDownloader {
    client: RepositoryClient,
}

impl ContentDownloader {
    pub fn new(client: RepositoryClient) -> Self {
        Self { client }
    }

    /// Save the content tree of `hash` under `dest_dir`. Resolves once every
    /// record has been consumed and every file flushed.
    pub async fn download_to_path(&self, hash: &str, dest_dir: &Path) -> RepoResult<DownloadSummary> {
        let archive = self.client.fetch_content(hash).await?;
        let dest = dest_dir.to_path_buf();
        info!("downloading {} into {}", hash, dest.display());

        let summary = tokio::task::spawn_blocking(move || worker::unpack_archive(archive, &dest))
            .await
            .map_err(|e| RepoError::Worker(e.to_string()))??;

        info!(
            "downloaded {}: {} directories, {} files, {} bytes",
            hash, summary.directories, summary.files, summary.bytes_written
        );
        Ok(summary)
    }
}
