//! Commands module - the async API a desktop frontend binds to
//!
//! Every command returns `Result<T, String>`. An unbound daemon is always
//! reported as the bare `IPFS NOT AVAILABLE` sentinel; other failures are
//! prefixed with the action that failed.
//! - `repo_commands`: connection, pins, stats, storage list, GC
//! - `peer_commands`: swarm peers, identity, providers
//! - `transfer_commands`: adding local content and downloading objects

mod peer_commands;
mod repo_commands;
mod transfer_commands;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::daemon::DaemonConnection;
use crate::download::ContentDownloader;
use crate::error::{RepoError, ERROR_IPFS_UNAVAILABLE};
use crate::repo::{RepositoryClient, StorageListAggregator};

// Re-export all commands
pub use peer_commands::*;
pub use repo_commands::*;
pub use transfer_commands::*;

/// State shared by every command for the lifetime of the app.
#[derive(Debug, Clone)]
pub struct AppState {
    config: AppConfig,
    client: RepositoryClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let connection = Arc::new(DaemonConnection::new(config.client_options()));
        Self::with_connection(config, connection)
    }

    pub fn with_connection(config: AppConfig, connection: Arc<DaemonConnection>) -> Self {
        Self {
            config,
            client: RepositoryClient::new(connection),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn connection(&self) -> &Arc<DaemonConnection> {
        self.client.connection()
    }

    pub fn repository(&self) -> &RepositoryClient {
        &self.client
    }

    pub fn storage_list_aggregator(&self) -> StorageListAggregator {
        StorageListAggregator::new(self.client.clone())
            .with_max_concurrent_stats(self.config.max_concurrent_stats)
    }

    pub fn downloader(&self) -> ContentDownloader {
        ContentDownloader::new(self.client.clone())
    }
}

pub(crate) fn command_error(action: &str, err: RepoError) -> String {
    if err.is_unavailable() {
        ERROR_IPFS_UNAVAILABLE.to_string()
    } else {
        format!("Failed to {}: {}", action, err)
    }
}
