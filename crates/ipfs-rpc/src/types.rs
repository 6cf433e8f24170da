//! Wire types of the control API responses

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{RpcError, RpcResult};

/// DHT query event type carrying provider records.
const QUERY_EVENT_PROVIDER: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinType {
    Direct,
    Recursive,
    Indirect,
}

impl std::fmt::Display for PinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PinType::Direct => write!(f, "direct"),
            PinType::Recursive => write!(f, "recursive"),
            PinType::Indirect => write!(f, "indirect"),
        }
    }
}

/// Options forwarded to `pin/add`, `pin/rm` and `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinOptions {
    pub recursive: bool,
}

impl PinOptions {
    pub fn recursive() -> Self {
        Self { recursive: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPin {
    pub hash: String,
    pub pin_type: PinType,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PinLsEntry {
    #[serde(rename = "Type")]
    pub pin_type: PinType,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PinLsResponse {
    #[serde(rename = "Keys", default)]
    pub keys: Option<BTreeMap<String, PinLsEntry>>,
}

impl PinLsResponse {
    pub(crate) fn into_pins(self) -> Vec<RawPin> {
        self.keys
            .unwrap_or_default()
            .into_iter()
            .map(|(hash, entry)| RawPin {
                hash,
                pin_type: entry.pin_type,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PinChangeResponse {
    #[serde(rename = "Pins", default)]
    pub pins: Option<Vec<String>>,
}

/// `object/stat` as sent by the daemon, sizes in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawObjectStat {
    pub hash: String,
    #[serde(default)]
    pub num_links: u64,
    #[serde(default)]
    pub block_size: u64,
    #[serde(default)]
    pub links_size: u64,
    #[serde(default)]
    pub data_size: u64,
    #[serde(default)]
    pub cumulative_size: u64,
}

/// `repo/stat` as sent by the daemon, sizes in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRepoStat {
    #[serde(default)]
    pub repo_size: u64,
    #[serde(default)]
    pub storage_max: u64,
    #[serde(default)]
    pub num_objects: u64,
    #[serde(default)]
    pub repo_path: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwarmPeer {
    #[serde(default)]
    pub addr: String,
    #[serde(default)]
    pub peer: String,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub muxer: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SwarmPeersResponse {
    #[serde(rename = "Peers", default)]
    pub peers: Option<Vec<SwarmPeer>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdentity {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "PublicKey", default)]
    pub public_key: String,
    #[serde(rename = "Addresses", default)]
    pub addresses: Option<Vec<String>>,
    #[serde(rename = "AgentVersion", default)]
    pub agent_version: String,
    #[serde(rename = "ProtocolVersion", default)]
    pub protocol_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Addrs", default)]
    pub addrs: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryEvent {
    #[serde(rename = "Type", default)]
    pub event_type: i32,
    #[serde(rename = "Responses", default)]
    pub responses: Option<Vec<Provider>>,
    #[serde(rename = "Extra", default)]
    pub extra: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CidLink {
    #[serde(rename = "/")]
    pub cid: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GcEvent {
    #[serde(rename = "Key", default)]
    pub key: Option<CidLink>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

/// One line of the `add` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedEntry {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Hash", default)]
    pub hash: String,
    #[serde(rename = "Size", default)]
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub root_hash: String,
    pub entries: Vec<AddedEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(rename = "Message")]
    pub message: String,
}

/// Decode a newline-delimited JSON body, skipping blank lines.
pub(crate) fn parse_ndjson<T: DeserializeOwned>(command: &str, body: &str) -> RpcResult<Vec<T>> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str(line).map_err(|source| RpcError::Decode {
                command: command.to_string(),
                source,
            })
        })
        .collect()
}

/// Collect removed keys from `repo/gc` events, failing on the first reported error.
pub(crate) fn collect_gc_keys(events: Vec<GcEvent>) -> RpcResult<Vec<String>> {
    let mut removed = Vec::with_capacity(events.len());
    for event in events {
        if let Some(message) = event.error.filter(|m| !m.is_empty()) {
            return Err(RpcError::Stream {
                command: "repo/gc".to_string(),
                message,
            });
        }
        if let Some(key) = event.key {
            removed.push(key.cid);
        }
    }
    Ok(removed)
}

/// Keep provider records from `dht/findprovs` events, one per peer ID.
pub(crate) fn collect_providers(events: Vec<QueryEvent>) -> Vec<Provider> {
    let mut seen = HashSet::new();
    let mut providers = Vec::new();
    for event in events {
        if event.event_type != QUERY_EVENT_PROVIDER {
            if !event.extra.is_empty() {
                log::debug!("findprovs: query event {} {}", event.event_type, event.extra);
            }
            continue;
        }
        for provider in event.responses.unwrap_or_default() {
            if !provider.id.is_empty() && seen.insert(provider.id.clone()) {
                providers.push(provider);
            }
        }
    }
    providers
}

/// Pick the root of an `add`: the entry named after the added path, else the last one.
pub(crate) fn select_add_root(entries: &[AddedEntry], root_name: &str) -> Option<String> {
    entries
        .iter()
        .rev()
        .find(|entry| entry.name == root_name && !entry.hash.is_empty())
        .or_else(|| entries.iter().rev().find(|entry| !entry.hash.is_empty()))
        .map(|entry| entry.hash.clone())
}
