//! The daemon RPC surface consumed by the repository layer

use async_trait::async_trait;
use ipfs_rpc::{
    IpfsClient, NodeIdentity, PinOptions, Provider, RawObjectStat, RawPin, RawRepoStat, RpcResult,
    SwarmPeer,
};
use std::io::Read;
use std::path::Path;
use tokio_util::io::SyncIoBridge;

/// Blocking reader over a `get` tar stream, consumed on a blocking worker.
pub type ContentArchive = Box<dyn Read + Send>;

/// Daemon operations as an opaque asynchronous call surface.
#[async_trait]
pub trait DaemonRpc: Send + Sync {
    async fn add_from_fs(&self, path: &Path) -> RpcResult<String>;
    async fn pin_add(&self, hash: &str, options: PinOptions) -> RpcResult<Vec<String>>;
    async fn pin_rm(&self, hash: &str, options: PinOptions) -> RpcResult<Vec<String>>;
    async fn pin_ls(&self) -> RpcResult<Vec<RawPin>>;
    async fn object_stat(&self, hash: &str) -> RpcResult<RawObjectStat>;
    async fn repo_stat(&self) -> RpcResult<RawRepoStat>;
    async fn repo_gc(&self) -> RpcResult<Vec<String>>;
    async fn swarm_peers(&self) -> RpcResult<Vec<SwarmPeer>>;
    async fn id(&self) -> RpcResult<NodeIdentity>;
    async fn dht_findprovs(&self, hash: &str) -> RpcResult<Vec<Provider>>;
    /// Must be called from within a tokio runtime; the returned reader
    /// pulls from the async body and may only be read off the runtime threads.
    async fn files_get(&self, hash: &str) -> RpcResult<ContentArchive>;
}

#[async_trait]
impl DaemonRpc for IpfsClient {
    async fn add_from_fs(&self, path: &Path) -> RpcResult<String> {
        Ok(self.add_path(path).await?.root_hash)
    }

    async fn pin_add(&self, hash: &str, options: PinOptions) -> RpcResult<Vec<String>> {
        IpfsClient::pin_add(self, hash, options).await
    }

    async fn pin_rm(&self, hash: &str, options: PinOptions) -> RpcResult<Vec<String>> {
        IpfsClient::pin_rm(self, hash, options).await
    }

    async fn pin_ls(&self) -> RpcResult<Vec<RawPin>> {
        IpfsClient::pin_ls(self).await
    }

    async fn object_stat(&self, hash: &str) -> RpcResult<RawObjectStat> {
        IpfsClient::object_stat(self, hash).await
    }

    async fn repo_stat(&self) -> RpcResult<RawRepoStat> {
        IpfsClient::repo_stat(self).await
    }

    async fn repo_gc(&self) -> RpcResult<Vec<String>> {
        IpfsClient::repo_gc(self).await
    }

    async fn swarm_peers(&self) -> RpcResult<Vec<SwarmPeer>> {
        IpfsClient::swarm_peers(self).await
    }

    async fn id(&self) -> RpcResult<NodeIdentity> {
        IpfsClient::id(self).await
    }

    async fn dht_findprovs(&self, hash: &str) -> RpcResult<Vec<Provider>> {
        IpfsClient::dht_findprovs(self, hash).await
    }

    async fn files_get(&self, hash: &str) -> RpcResult<ContentArchive> {
        let reader = self.get(hash).await?;
        Ok(Box::new(SyncIoBridge::new(reader)))
    }
}
