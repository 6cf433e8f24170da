//! Download records and result types

use serde::Serialize;
use std::path::PathBuf;

/// One record of an object's content tree, relative to the download root.
pub enum FileRecord<R> {
    /// Must be created before any of its descendants are written.
    Directory { path: PathBuf },
    File { path: PathBuf, content: R },
    /// Symlinks and other entry kinds, skipped.
    Unsupported { path: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadSummary {
    pub directories: usize,
    pub files: usize,
    pub bytes_written: u64,
}
