use crate::core_ftpcommand::utils::{resolve_path, send_response, ControlWriter, PathError};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the CWD command.
///
/// Resolves the parameter lexically against the current working directory
/// and only commits the change after a stat confirms the target exists and
/// is a directory. On any failure the working directory stays untouched.
pub async fn handle_cwd_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let current_dir = {
        let session = session.lock().await;
        session.current_dir.clone()
    };

    let new_dir = match resolve_path(&current_dir, &arg) {
        Ok(path) => path,
        Err(PathError::AtTopmostDirectory) => {
            return send_response(
                writer,
                b"431 Error changing directory: Already at topmost directory\r\n",
            )
            .await;
        }
    };

    match tokio::fs::metadata(&new_dir).await {
        Ok(meta) if meta.is_dir() => {
            info!("Working directory changed to {:?}", new_dir);
            session.lock().await.current_dir = new_dir;
            send_response(writer, b"200 Working directory changed.\r\n").await
        }
        Ok(_) => {
            let response = format!("431 {} is not a directory!\r\n", arg);
            send_response(writer, response.as_bytes()).await
        }
        Err(e) => {
            let response = format!("431 Error changing directory: {}\r\n", e);
            send_response(writer, response.as_bytes()).await
        }
    }
}
