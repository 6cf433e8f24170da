//! Typed repository operations over the daemon connection

use ipfs_rpc::{NodeIdentity, PinOptions, Provider, SwarmPeer};
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

use super::types::{GcReport, ObjectStat, PinEntry, RepoStat};
use crate::daemon::{ContentArchive, DaemonConnection, DaemonRpc};
use crate::error::RepoResult;

/// Every call checks the connection first and fails with
/// `DaemonUnavailable` without touching the daemon when it is not bound.
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    connection: Arc<DaemonConnection>,
}

impl RepositoryClient {
    pub fn new(connection: Arc<DaemonConnection>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Arc<DaemonConnection> {
        &self.connection
    }

    fn daemon(&self) -> RepoResult<Arc<dyn DaemonRpc>> {
        self.connection.handle()
    }

    // ============ Pin lifecycle ============

    /// Add a local file or directory tree, returning the root content address.
    pub async fn add_from_path(&self, path: &Path) -> RepoResult<String> {
        let daemon = self.daemon()?;
        let hash = daemon.add_from_fs(path).await?;
        info!("added {} as {}", path.display(), hash);
        Ok(hash)
    }

    /// Recursively remove the pin on `hash`. The content stays until the next GC.
    pub async fn unpin(&self, hash: &str) -> RepoResult<Vec<String>> {
        let daemon = self.daemon()?;
        let removed = daemon.pin_rm(hash, PinOptions::recursive()).await?;
        info!("unpinned {}", hash);
        Ok(removed)
    }

    /// Fetch and recursively pin a remote object.
    pub async fn import_by_hash(&self, hash: &str) -> RepoResult<Vec<String>> {
        let daemon = self.daemon()?;
        let added = daemon.pin_add(hash, PinOptions::recursive()).await?;
        info!("imported {}", hash);
        Ok(added)
    }

    pub async fn list_pins(&self) -> RepoResult<Vec<PinEntry>> {
        let daemon = self.daemon()?;
        let pins = daemon.pin_ls().await?;
        debug!("pin/ls returned {} entries", pins.len());
        Ok(pins.into_iter().map(PinEntry::from).collect())
    }

    // ============ Stats ============

    pub async fn stat_object(&self, hash: &str) -> RepoResult<ObjectStat> {
        let daemon = self.daemon()?;
        Ok(daemon.object_stat(hash).await?.into())
    }

    pub async fn repo_stat(&self) -> RepoResult<RepoStat> {
        let daemon = self.daemon()?;
        Ok(daemon.repo_stat().await?.into())
    }

    pub async fn garbage_collect(&self) -> RepoResult<GcReport> {
        let daemon = self.daemon()?;
        let removed = daemon.repo_gc().await?;
        info!("garbage collection removed {} objects", removed.len());
        Ok(GcReport { removed })
    }

    // ============ Peers ============

    pub async fn list_peers(&self) -> RepoResult<Vec<SwarmPeer>> {
        let daemon = self.daemon()?;
        Ok(daemon.swarm_peers().await?)
    }

    pub async fn self_id(&self) -> RepoResult<NodeIdentity> {
        let daemon = self.daemon()?;
        Ok(daemon.id().await?)
    }

    /// Peers advertising `hash`. An empty answer is not an error.
    pub async fn find_providers(&self, hash: &str) -> RepoResult<Vec<Provider>> {
        let daemon = self.daemon()?;
        let providers = daemon.dht_findprovs(hash).await?;
        debug!("{} providers found for {}", providers.len(), hash);
        Ok(providers)
    }

    // ============ Content ============

    pub(crate) async fn fetch_content(&self, hash: &str) -> RepoResult<ContentArchive> {
        let daemon = self.daemon()?;
        Ok(daemon.files_get(hash).await?)
    }
}
