//! Repo module - repository and object management
//!
//! - `types`: display records (pins, object and repo stats, GC report)
//! - `client`: typed daemon operations, each gated on the connection
//! - `storage_list`: pin list + per-pin stats fan-out/fan-in

mod client;
mod storage_list;
mod types;

pub use client::RepositoryClient;
pub use storage_list::StorageListAggregator;
pub use types::{GcReport, ObjectStat, PinEntry, RepoStat};
