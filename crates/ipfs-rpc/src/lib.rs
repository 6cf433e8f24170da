//! Typed client for the IPFS daemon HTTP control API (`/api/v0`)
//!
//! - `endpoint`: multiaddress / URL resolution
//! - `client`: request building, status and error-body handling, decoding
//! - `add`: streaming multipart bodies for adding files and directories
//! - `types`: wire records as the daemon sends them (sizes in raw bytes)

mod add;
mod client;
pub mod endpoint;
mod error;
mod types;

pub use client::{ClientOptions, ContentReader, IpfsClient};
pub use endpoint::api_base_url;
pub use error::{RpcError, RpcResult};
pub use types::{
    AddOutcome, AddedEntry, NodeIdentity, PinOptions, PinType, Provider, RawObjectStat, RawPin,
    RawRepoStat, SwarmPeer,
};
