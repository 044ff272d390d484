use crate::core_ftpcommand::utils::{send_response, ControlWriter};

/// Handles the PASV command.
///
/// Passive mode is a recognized protocol state but deliberately
/// unsupported: this server only initiates active-mode data connections.
/// The command is refused explicitly rather than handing back a bogus
/// data connection.
pub async fn handle_pasv_command(writer: &ControlWriter) -> Result<(), std::io::Error> {
    send_response(writer, b"502 Command parsed but not implemented yet.\r\n").await
}
