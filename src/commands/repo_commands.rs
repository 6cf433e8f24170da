//! Repository commands: connection, pins, stats, storage list, GC

use crate::repo::{GcReport, ObjectStat, PinEntry, RepoStat};

use super::{command_error, AppState};

// ============ Connection ============

/// Bind the daemon connection to the configured endpoint. Idempotent.
pub async fn start_daemon_connection(state: &AppState) -> Result<String, String> {
    state
        .connection()
        .initialize(&state.config().api_multiaddr)
        .map_err(|e| command_error("connect to daemon", e))?;
    state
        .connection()
        .endpoint()
        .ok_or_else(|| "Daemon connection was not bound".to_string())
}

pub async fn daemon_available(state: &AppState) -> bool {
    state.connection().is_available()
}

// ============ Pins ============

pub async fn list_pins(state: &AppState) -> Result<Vec<PinEntry>, String> {
    state
        .repository()
        .list_pins()
        .await
        .map_err(|e| command_error("list pins", e))
}

pub async fn unpin_object(state: &AppState, hash: String) -> Result<Vec<String>, String> {
    state
        .repository()
        .unpin(&hash)
        .await
        .map_err(|e| command_error("unpin object", e))
}

pub async fn import_object(state: &AppState, hash: String) -> Result<Vec<String>, String> {
    state
        .repository()
        .import_by_hash(&hash)
        .await
        .map_err(|e| command_error("import object", e))
}

// ============ Stats ============

pub async fn object_stat(state: &AppState, hash: String) -> Result<ObjectStat, String> {
    state
        .repository()
        .stat_object(&hash)
        .await
        .map_err(|e| command_error("stat object", e))
}

pub async fn repo_info(state: &AppState) -> Result<RepoStat, String> {
    state
        .repository()
        .repo_stat()
        .await
        .map_err(|e| command_error("get repository info", e))
}

/// Consolidated pin table for the storage page.
pub async fn storage_list(state: &AppState) -> Result<Vec<PinEntry>, String> {
    state
        .storage_list_aggregator()
        .storage_list()
        .await
        .map_err(|e| command_error("build storage list", e))
}

// ============ Maintenance ============

pub async fn run_garbage_collector(state: &AppState) -> Result<GcReport, String> {
    state
        .repository()
        .garbage_collect()
        .await
        .map_err(|e| command_error("run garbage collector", e))
}
