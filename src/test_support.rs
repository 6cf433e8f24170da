//! In-memory daemon used by unit tests

use async_trait::async_trait;
use ipfs_rpc::{
    NodeIdentity, PinOptions, PinType, Provider, RawObjectStat, RawPin, RawRepoStat, RpcError,
    RpcResult, SwarmPeer,
};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

use crate::daemon::{ContentArchive, DaemonConnection, DaemonRpc};

pub(crate) const MOCK_ENDPOINT: &str = "/ip4/127.0.0.1/tcp/5001";

#[derive(Default)]
pub(crate) struct MockDaemon {
    pins: Vec<RawPin>,
    stats: HashMap<String, RawObjectStat>,
    removable: Vec<String>,
    archive: Vec<u8>,
    stat_barrier: Option<Arc<Barrier>>,
    stalled_stats: Vec<String>,
    calls: Mutex<Vec<String>>,
    pin_options: Mutex<Vec<(String, PinOptions)>>,
}

impl MockDaemon {
    pub(crate) fn with_pin(mut self, hash: &str, pin_type: PinType) -> Self {
        self.pins.push(RawPin {
            hash: hash.to_string(),
            pin_type,
        });
        self
    }

    pub(crate) fn with_stat(mut self, hash: &str, cumulative_size: u64) -> Self {
        self.stats.insert(
            hash.to_string(),
            RawObjectStat {
                hash: hash.to_string(),
                num_links: 0,
                block_size: 256,
                links_size: 0,
                data_size: 250,
                cumulative_size,
            },
        );
        self
    }

    /// Every `object/stat` waits until `parties` stats are in flight at once.
    pub(crate) fn with_stat_barrier(mut self, parties: usize) -> Self {
        self.stat_barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    /// `object/stat` for `hash` never answers.
    pub(crate) fn with_stalled_stat(mut self, hash: &str) -> Self {
        self.stalled_stats.push(hash.to_string());
        self
    }

    pub(crate) fn with_removable(mut self, hash: &str) -> Self {
        self.removable.push(hash.to_string());
        self
    }

    pub(crate) fn with_archive(mut self, archive: Vec<u8>) -> Self {
        self.archive = archive;
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn pin_options(&self) -> Vec<(String, PinOptions)> {
        self.pin_options.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

/// A connection already bound to `mock`.
pub(crate) fn connected(mock: Arc<MockDaemon>) -> Arc<DaemonConnection> {
    let connection = DaemonConnection::with_connector(move |_| Ok(mock.clone() as Arc<dyn DaemonRpc>));
    if connection.initialize(MOCK_ENDPOINT).is_err() {
        panic!("mock connector never fails");
    }
    Arc::new(connection)
}

#[async_trait]
impl DaemonRpc for MockDaemon {
    async fn add_from_fs(&self, path: &Path) -> RpcResult<String> {
        self.record(format!("add {}", path.display()));
        Ok("QmAdded".to_string())
    }

    async fn pin_add(&self, hash: &str, options: PinOptions) -> RpcResult<Vec<String>> {
        self.record(format!("pin/add {}", hash));
        self.pin_options
            .lock()
            .unwrap()
            .push((format!("pin/add {}", hash), options));
        Ok(vec![hash.to_string()])
    }

    async fn pin_rm(&self, hash: &str, options: PinOptions) -> RpcResult<Vec<String>> {
        self.record(format!("pin/rm {}", hash));
        self.pin_options
            .lock()
            .unwrap()
            .push((format!("pin/rm {}", hash), options));
        Ok(vec![hash.to_string()])
    }

    async fn pin_ls(&self) -> RpcResult<Vec<RawPin>> {
        self.record("pin/ls".to_string());
        Ok(self.pins.clone())
    }

    async fn object_stat(&self, hash: &str) -> RpcResult<RawObjectStat> {
        self.record(format!("object/stat {}", hash));
        if self.stalled_stats.iter().any(|stalled| stalled == hash) {
            std::future::pending::<()>().await;
        }
        if let Some(barrier) = &self.stat_barrier {
            barrier.wait().await;
        }
        self.stats.get(hash).cloned().ok_or_else(|| RpcError::Daemon {
            command: "object/stat".to_string(),
            status: 500,
            message: format!("block {} not found", hash),
        })
    }

    async fn repo_stat(&self) -> RpcResult<RawRepoStat> {
        self.record("repo/stat".to_string());
        Ok(RawRepoStat {
            repo_size: 1_234_567,
            storage_max: 10_000_000_000,
            num_objects: 3,
            repo_path: "/home/mock/.ipfs".to_string(),
            version: "fs-repo@15".to_string(),
        })
    }

    async fn repo_gc(&self) -> RpcResult<Vec<String>> {
        self.record("repo/gc".to_string());
        Ok(self.removable.clone())
    }

    async fn swarm_peers(&self) -> RpcResult<Vec<SwarmPeer>> {
        self.record("swarm/peers".to_string());
        Ok(Vec::new())
    }

    async fn id(&self) -> RpcResult<NodeIdentity> {
        self.record("id".to_string());
        Ok(NodeIdentity {
            id: "12D3KooWMock".to_string(),
            public_key: String::new(),
            addresses: None,
            agent_version: "kubo/mock".to_string(),
            protocol_version: "ipfs/0.1.0".to_string(),
        })
    }

    async fn dht_findprovs(&self, hash: &str) -> RpcResult<Vec<Provider>> {
        self.record(format!("dht/findprovs {}", hash));
        Ok(Vec::new())
    }

    async fn files_get(&self, hash: &str) -> RpcResult<ContentArchive> {
        self.record(format!("get {}", hash));
        Ok(Box::new(Cursor::new(self.archive.clone())))
    }
}
