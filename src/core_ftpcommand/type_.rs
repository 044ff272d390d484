use crate::core_ftpcommand::utils::{send_response, ControlWriter};
use crate::session::{Session, TransferType};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the TYPE command. Only binary ("Image") transfers are
/// supported; every other representation type is refused.
pub async fn handle_type_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
    code: char,
) -> Result<(), std::io::Error> {
    if code == 'I' {
        session.lock().await.transfer_type = TransferType::Image;
        send_response(writer, b"200 Type set to I.\r\n").await
    } else {
        let response = format!("500 Type {} not supported.\r\n", code);
        send_response(writer, response.as_bytes()).await
    }
}
