use crate::core_ftpcommand::utils::{send_response, ControlWriter};
use crate::session::{Session, StructureType};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the STRU command. Only the file structure is supported.
pub async fn handle_stru_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
    code: char,
) -> Result<(), std::io::Error> {
    if code == 'F' {
        session.lock().await.structure_type = StructureType::File;
        send_response(writer, b"200 Structure set to F.\r\n").await
    } else {
        let response = format!("500 Structure {} not supported.\r\n", code);
        send_response(writer, response.as_bytes()).await
    }
}
