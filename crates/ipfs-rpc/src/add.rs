//! Multipart body for `add`

use futures_util::{stream, TryStreamExt};
use log::warn;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::path::{Path, PathBuf};
use tokio_util::io::ReaderStream;

use crate::error::{RpcError, RpcResult};

const DIRECTORY_MIME: &str = "application/x-directory";
const FILE_MIME: &str = "application/octet-stream";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RpcError + '_ {
    move |source| RpcError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn directory_part(relative: &str) -> RpcResult<Part> {
    Ok(Part::bytes(Vec::new())
        .file_name(urlencoding::encode(relative).into_owned())
        .mime_str(DIRECTORY_MIME)?)
}

// The file is opened only when the part is streamed, and closed at its end.
fn file_part(path: &Path, relative: &str, length: u64) -> RpcResult<Part> {
    let path = path.to_path_buf();
    let content = stream::once(async move { tokio::fs::File::open(path).await })
        .map_ok(ReaderStream::new)
        .try_flatten();
    let body = Body::wrap_stream(content);
    Ok(Part::stream_with_length(body, length)
        .file_name(urlencoding::encode(relative).into_owned())
        .mime_str(FILE_MIME)?)
}

/// Build the `add` form for `root`, returning it with the name the daemon
/// will report for the root entry. Directories are walked depth-first with
/// every directory part emitted before its children; file bodies are
/// streamed from disk when the request is sent.
pub(crate) async fn build_add_form(root: &Path) -> RpcResult<(Form, String)> {
    // Resolves `.` and `..` so the root always has a file name.
    let canonical = tokio::fs::canonicalize(root).await.map_err(io_error(root))?;
    let root = canonical.as_path();
    let root_name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| RpcError::InvalidPath(root.to_path_buf()))?;

    let metadata = tokio::fs::metadata(root).await.map_err(io_error(root))?;
    let mut form = Form::new();

    if !metadata.is_dir() {
        form = form.part("file", file_part(root, &root_name, metadata.len())?);
        return Ok((form, root_name));
    }

    form = form.part("file", directory_part(&root_name)?);
    let mut pending: Vec<(PathBuf, String)> = vec![(root.to_path_buf(), root_name.clone())];

    while let Some((dir, relative_dir)) = pending.pop() {
        let mut children = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(io_error(&dir))?;
        while let Some(entry) = entries.next_entry().await.map_err(io_error(&dir))? {
            children.push(entry);
        }
        children.sort_by_key(|entry| entry.file_name());

        for entry in children {
            let path = entry.path();
            let relative = format!(
                "{}/{}",
                relative_dir,
                entry.file_name().to_string_lossy()
            );
            let file_type = entry.file_type().await.map_err(io_error(&path))?;

            if file_type.is_dir() {
                form = form.part("file", directory_part(&relative)?);
                pending.push((path, relative));
            } else if file_type.is_file() {
                let length = entry.metadata().await.map_err(io_error(&path))?.len();
                form = form.part("file", file_part(&path, &relative, length)?);
            } else {
                warn!("add: skipping {} (not a regular file or directory)", path.display());
            }
        }
    }

    Ok((form, root_name))
}
