//! Peer discovery commands

use ipfs_rpc::{NodeIdentity, Provider, SwarmPeer};

use super::{command_error, AppState};

pub async fn swarm_peers(state: &AppState) -> Result<Vec<SwarmPeer>, String> {
    state
        .repository()
        .list_peers()
        .await
        .map_err(|e| command_error("list peers", e))
}

pub async fn node_identity(state: &AppState) -> Result<NodeIdentity, String> {
    state
        .repository()
        .self_id()
        .await
        .map_err(|e| command_error("get node identity", e))
}

/// Peers advertising `hash`. An empty list is a valid answer.
pub async fn find_providers(state: &AppState, hash: String) -> Result<Vec<Provider>, String> {
    state
        .repository()
        .find_providers(&hash)
        .await
        .map_err(|e| command_error("find providers", e))
}
