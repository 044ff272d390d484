use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Write half of a control connection, shared between the command loop and
/// the handlers that reply on it.
pub type ControlWriter = Arc<Mutex<OwnedWriteHalf>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Already at topmost directory")]
    AtTopmostDirectory,
}

/// Resolves a command's path parameter against the session's working
/// directory, purely lexically:
///
/// - an absolute parameter is used verbatim,
/// - a parameter starting with `..` strips one segment off the working
///   directory (an error when it is already the filesystem root),
/// - anything else is joined onto the working directory.
///
/// No canonicalization happens here. Symlinks and `..` sequences embedded
/// deeper in a relative parameter pass through untouched, matching the
/// reference behavior this server reproduces.
pub fn resolve_path(cwd: &Path, arg: &str) -> Result<PathBuf, PathError> {
    if arg.starts_with('/') {
        Ok(PathBuf::from(arg))
    } else if arg.starts_with("..") {
        if cwd == Path::new("/") {
            return Err(PathError::AtTopmostDirectory);
        }
        let mut parent = cwd.to_path_buf();
        parent.pop();
        Ok(parent)
    } else {
        Ok(cwd.join(arg))
    }
}

/// Sends a reply line to the client.
pub async fn send_response(writer: &ControlWriter, message: &[u8]) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer.write_all(message).await?;
    Ok(())
}
