//! Transfer commands: adding local content and downloading objects

use log::info;
use std::path::PathBuf;

use crate::download::DownloadSummary;

use super::{command_error, AppState};

/// Add a file or directory tree from disk. Returns the root content address.
pub async fn add_path(state: &AppState, path: String) -> Result<String, String> {
    let path = PathBuf::from(path);
    let hash = state
        .repository()
        .add_from_path(&path)
        .await
        .map_err(|e| command_error("add content", e))?;
    info!("added {} as {}", path.display(), hash);
    Ok(hash)
}

pub async fn download_object(
    state: &AppState,
    hash: String,
    dest_dir: String,
) -> Result<DownloadSummary, String> {
    state
        .downloader()
        .download_to_path(&hash, &PathBuf::from(dest_dir))
        .await
        .map_err(|e| command_error("download object", e))
}
