use crate::core_ftpcommand::utils::{resolve_path, send_response, ControlWriter};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Handles the RMD (Remove Directory) command.
pub async fn handle_rmd_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let dir_path = {
        let session = session.lock().await;
        match resolve_path(&session.current_dir, &arg) {
            Ok(path) => path,
            Err(e) => {
                drop(session);
                let response = format!("550 Filesystem error: {}\r\n", e);
                return send_response(writer, response.as_bytes()).await;
            }
        }
    };

    match fs::remove_dir(&dir_path).await {
        Ok(()) => {
            info!("Directory removed: {:?}", dir_path);
            send_response(writer, b"250 Requested file action okay, completed.\r\n").await
        }
        Err(e) => {
            let response = format!("550 Filesystem error: {}\r\n", e);
            send_response(writer, response.as_bytes()).await
        }
    }
}
