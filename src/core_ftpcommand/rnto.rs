use crate::core_ftpcommand::utils::{resolve_path, send_response, ControlWriter};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Handles the RNTO (Rename To) command.
///
/// Requires a pending RNFR source; the source is cleared whether or not the
/// rename succeeds, so a second RNTO without a fresh RNFR is a sequencing
/// error again.
pub async fn handle_rnto_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let (from_path, to_path) = {
        let mut session = session.lock().await;
        let Some(from_path) = session.rename_from.take() else {
            drop(session);
            return send_response(writer, b"503 Bad sequence of commands. Use RNFR first.\r\n")
                .await;
        };
        let to_path = resolve_path(&session.current_dir, &arg);
        (from_path, to_path)
    };

    let to_path = match to_path {
        Ok(path) => path,
        Err(e) => {
            let response = format!("550 Filesystem error: {}\r\n", e);
            return send_response(writer, response.as_bytes()).await;
        }
    };

    match fs::rename(&from_path, &to_path).await {
        Ok(()) => {
            info!("Renamed {:?} -> {:?}", from_path, to_path);
            send_response(writer, b"250 Requested file action okay, completed.\r\n").await
        }
        Err(e) => {
            let response = format!("550 Filesystem error: {}\r\n", e);
            send_response(writer, response.as_bytes()).await
        }
    }
}
