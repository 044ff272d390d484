use crate::core_ftpcommand::utils::{send_response, ControlWriter};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the PWD command: replies with the quoted virtual working
/// directory.
pub async fn handle_pwd_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
) -> Result<(), std::io::Error> {
    let current_dir = {
        let session = session.lock().await;
        session.current_dir.display().to_string()
    };

    let response = format!("257 \"{}\"\r\n", current_dir);
    send_response(writer, response.as_bytes()).await
}
