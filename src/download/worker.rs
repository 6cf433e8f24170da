//! Download worker - blocking record consumption and scoped file writes

use log::{debug, warn};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};

use super::types::{DownloadSummary, FileRecord};
use crate::error::{RepoError, RepoResult};

/// Write buffer per destination file - reduces I/O operations
const WRITE_BUFFER_SIZE: usize = 256 * 1024;

/// Bytes pulled from the content stream per read
const COPY_CHUNK_SIZE: usize = 64 * 1024;

/// View a tar stream as a lazy sequence of file records. Each record's
/// content must be consumed (or dropped) before the next one is pulled.
pub fn archive_records<'a, R: Read + 'a>(
    archive: &'a mut tar::Archive<R>,
) -> RepoResult<impl Iterator<Item = RepoResult<FileRecord<tar::Entry<'a, R>>>> + 'a> {
    let entries = archive.entries().map_err(RepoError::ContentStream)?;
    Ok(entries.map(|entry| {
        let entry = entry.map_err(RepoError::ContentStream)?;
        let path = entry.path().map_err(RepoError::ContentStream)?.into_owned();
        let kind = entry.header().entry_type();

        let record = if kind.is_dir() {
            FileRecord::Directory { path }
        } else if kind.is_file() {
            FileRecord::File {
                path,
                content: entry,
            }
        } else {
            FileRecord::Unsupported { path }
        };
        Ok(record)
    }))
}

/// Materialize `records` under `dest`, in order.
pub fn write_records<R, I>(records: I, dest: &Path) -> RepoResult<DownloadSummary>
where
    R: Read,
    I: IntoIterator<Item = RepoResult<FileRecord<R>>>,
{
    let mut summary = DownloadSummary::default();

    for record in records {
        match record? {
            FileRecord::Directory { path } => {
                let target = resolve_target(dest, &path)?;
                create_directory(&target)?;
                summary.directories += 1;
            }
            FileRecord::File { path, mut content } => {
                let target = resolve_target(dest, &path)?;
                let written = write_file(&target, &mut content)?;
                debug!("wrote {} ({} bytes)", target.display(), written);
                summary.bytes_written += written;
                summary.files += 1;
            }
            FileRecord::Unsupported { path } => {
                warn!("skipping {}: unsupported entry type", path.display());
            }
        }
    }

    Ok(summary)
}

pub(crate) fn unpack_archive<R: Read>(reader: R, dest: &Path) -> RepoResult<DownloadSummary> {
    fs::create_dir_all(dest).map_err(RepoError::filesystem(dest))?;
    let mut archive = tar::Archive::new(reader);
    let records = archive_records(&mut archive)?;
    write_records(records, dest)
}

/// Join a record path onto `dest`, refusing anything that could escape it.
fn resolve_target(dest: &Path, path: &Path) -> RepoResult<PathBuf> {
    let mut target = dest.to_path_buf();
    for component in path.components() {
        match component {
            Component::Normal(part) => target.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(RepoError::UnsafePath(path.to_path_buf()));
            }
        }
    }
    Ok(target)
}

// Parents are expected to exist already: directory records precede their children.
fn create_directory(target: &Path) -> RepoResult<()> {
    match fs::create_dir(target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && target.is_dir() => Ok(()),
        Err(source) => Err(RepoError::Filesystem {
            path: target.to_path_buf(),
            source,
        }),
    }
}

fn write_file<R: Read>(target: &Path, content: &mut R) -> RepoResult<u64> {
    let file = File::create(target).map_err(RepoError::filesystem(target))?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    let mut chunk = vec![0u8; COPY_CHUNK_SIZE];
    let mut written: u64 = 0;

    loop {
        let read = match content.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(RepoError::ContentStream(e)),
        };
        writer
            .write_all(&chunk[..read])
            .map_err(RepoError::filesystem(target))?;
        written += read as u64;
    }

    writer.flush().map_err(RepoError::filesystem(target))?;
    Ok(written)
}
