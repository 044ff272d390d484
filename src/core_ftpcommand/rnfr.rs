use crate::core_ftpcommand::utils::{resolve_path, send_response, ControlWriter};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the RNFR (Rename From) command.
///
/// Resolves and stores the rename source on the session; RNTO consumes it.
pub async fn handle_rnfr_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    let from_path = match resolve_path(&session.current_dir, &arg) {
        Ok(path) => path,
        Err(e) => {
            drop(session);
            let response = format!("550 Filesystem error: {}\r\n", e);
            return send_response(writer, response.as_bytes()).await;
        }
    };

    info!("Rename source set: {:?}", from_path);
    session.rename_from = Some(from_path);
    drop(session);

    send_response(writer, b"350 Please specify destination using RNTO now.\r\n").await
}
