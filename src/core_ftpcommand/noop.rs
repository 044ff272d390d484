use crate::core_ftpcommand::utils::{send_response, ControlWriter};

/// Handles the NOOP command.
pub async fn handle_noop_command(writer: &ControlWriter) -> Result<(), std::io::Error> {
    send_response(writer, b"200 Successfully did nothing.\r\n").await
}
