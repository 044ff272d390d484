use crate::config::Config;
use crate::core_ftpcommand::utils::{resolve_path, send_response, ControlWriter};
use crate::core_network::data::open_data_connection;
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;

/// Handles the RETR (Retrieve) command.
///
/// The file is opened before the data connection is attempted, so a missing
/// file never produces a dangling 150 reply. Every successful transfer ends
/// with 226 followed by 250, in that order.
pub async fn handle_retr_command(
    writer: &ControlWriter,
    config: &Arc<Config>,
    session: &Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let (file_path, data_addr) = {
        let session = session.lock().await;
        (
            resolve_path(&session.current_dir, &arg),
            session.data_addr,
        )
    };

    let file_path = match file_path {
        Ok(path) => path,
        Err(e) => {
            let response = format!("550 Filesystem error: {}\r\n", e);
            return send_response(writer, response.as_bytes()).await;
        }
    };

    let mut file = match File::open(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            let response = format!("550 Filesystem error: {}\r\n", e);
            return send_response(writer, response.as_bytes()).await;
        }
    };

    let mut data_socket = match open_data_connection(writer, data_addr).await {
        Ok(socket) => socket,
        // The connect failure was already reported on the control channel.
        Err(_) => return Ok(()),
    };

    info!("Sending file: {:?}", file_path);
    let buffer_size = config.server.download_buffer_size.unwrap_or(128 * 1024);
    let mut buffer = vec![0; buffer_size];

    loop {
        let bytes_read = match file.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!("Error reading file {:?}: {}", file_path, e);
                drop(data_socket);
                let response = format!("550 Filesystem error: {}\r\n", e);
                return send_response(writer, response.as_bytes()).await;
            }
        };
        // write_all loops internally, a partial send is never completion
        if let Err(e) = data_socket.write_all(&buffer[..bytes_read]).await {
            warn!("Data connection error during RETR: {}", e);
            drop(data_socket);
            return send_response(writer, b"426 Connection closed; transfer aborted.\r\n").await;
        }
    }

    if let Err(e) = data_socket.shutdown().await {
        warn!("Error closing data connection: {}", e);
        return send_response(writer, b"426 Connection closed; transfer aborted.\r\n").await;
    }
    drop(data_socket);

    send_response(writer, b"226 Closing data connection.\r\n").await?;
    send_response(writer, b"250 Requested file action okay, completed.\r\n").await
}
