//! Daemon module - connection to the local IPFS daemon
//!
//! - `rpc`: the RPC surface as an async trait, implemented by the HTTP client
//! - `connection`: the write-once connection that owns the handle

mod connection;
mod rpc;

pub use connection::{Connector, DaemonConnection};
pub use rpc::{ContentArchive, DaemonRpc};
