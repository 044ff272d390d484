use crate::config::Config;
use crate::constants::LIST_YEAR_CUTOFF_SECS;
use crate::core_ftpcommand::utils::{resolve_path, send_response, ControlWriter};
use crate::core_network::data::open_data_connection;
use crate::session::Session;
use chrono::{DateTime, Local};
use log::warn;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Formats one ls-style listing line.
///
/// The permission/owner/group fields are fixed placeholders; only the
/// entry kind, size, date and name vary. Entries modified within the last
/// six months show hour and minute, older ones show the year, per the
/// POSIX `ls` date convention.
fn format_entry(
    is_dir: bool,
    size: u64,
    mtime: DateTime<Local>,
    now: DateTime<Local>,
    name: &str,
) -> String {
    let kind = if is_dir { 'd' } else { '-' };
    let date = if now.timestamp() > mtime.timestamp() + LIST_YEAR_CUTOFF_SECS {
        mtime.format("%b %d  %Y")
    } else {
        mtime.format("%b %d %H:%M")
    };
    format!("{}rw-rw-rw- 1 user group {} {} {}\r\n", kind, size, date, name)
}

/// Handles the LIST command.
///
/// The optional parameter defaults to the working directory. Hidden
/// entries (leading dot) are skipped, and a stat failure on a single entry
/// skips that entry without aborting the listing.
pub async fn handle_list_command(
    writer: &ControlWriter,
    _config: &Arc<Config>,
    session: &Arc<Mutex<Session>>,
    arg: Option<String>,
) -> Result<(), std::io::Error> {
    let (dir_path, data_addr) = {
        let session = session.lock().await;
        let dir_path = match arg {
            None => Ok(session.current_dir.clone()),
            Some(ref arg) => resolve_path(&session.current_dir, arg),
        };
        (dir_path, session.data_addr)
    };

    let dir_path = match dir_path {
        Ok(path) => path,
        Err(e) => {
            let response = format!("450 Filesystem error: {}\r\n", e);
            return send_response(writer, response.as_bytes()).await;
        }
    };

    let mut dir = match tokio::fs::read_dir(&dir_path).await {
        Ok(dir) => dir,
        Err(e) => {
            let response = format!("450 Filesystem error: {}\r\n", e);
            return send_response(writer, response.as_bytes()).await;
        }
    };

    let mut data_socket = match open_data_connection(writer, data_addr).await {
        Ok(socket) => socket,
        // The connect failure was already reported on the control channel.
        Err(_) => return Ok(()),
    };

    let now = Local::now();
    loop {
        let entry = match dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Error reading directory {:?}: {}", dir_path, e);
                break;
            }
        };

        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }

        // Skip entries we cannot stat instead of aborting the listing.
        let meta = match entry.metadata().await {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Skipping {:?} in listing: {}", entry.path(), e);
                continue;
            }
        };
        let mtime: DateTime<Local> = meta
            .modified()
            .map(DateTime::from)
            .unwrap_or_else(|_| now);

        let line = format_entry(meta.is_dir(), meta.len(), mtime, now, &name);
        if let Err(e) = data_socket.write_all(line.as_bytes()).await {
            warn!("Data connection error during LIST: {}", e);
            drop(data_socket);
            return send_response(writer, b"426 Connection closed; transfer aborted.\r\n").await;
        }
    }

    drop(data_socket);
    send_response(writer, b"226 Closing data connection.\r\n").await?;
    send_response(writer, b"250 Requested file action okay, completed.\r\n").await
}
