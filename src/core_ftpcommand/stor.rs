use crate::config::Config;
use crate::core_ftpcommand::utils::{resolve_path, send_response, ControlWriter};
use crate::core_network::data::open_data_connection;
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;

/// Handles the STOR (Store) command.
///
/// Creates (truncating) the target file, then streams bytes from the data
/// connection into it until the peer closes. Every successful transfer
/// ends with 226 followed by 250.
pub async fn handle_stor_command(
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

    let mut file = match File::create(&file_path).await {
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

    let buffer_size = config.server.upload_buffer_size.unwrap_or(256 * 1024);
    let mut buffer = vec![0; buffer_size];

    loop {
        let bytes_received = match data_socket.read(&mut buffer).await {
            Ok(0) => break, // peer closed the data connection
            Ok(n) => n,
            Err(e) => {
                warn!("Data connection error during STOR: {}", e);
                drop(data_socket);
                return send_response(writer, b"426 Connection closed; transfer aborted.\r\n")
                    .await;
            }
        };
        if let Err(e) = file.write_all(&buffer[..bytes_received]).await {
            warn!("Error writing file {:?}: {}", file_path, e);
            drop(data_socket);
            let response = format!("550 Filesystem error: {}\r\n", e);
            return send_response(writer, response.as_bytes()).await;
        }
    }

    if let Err(e) = file.flush().await {
        let response = format!("550 Filesystem error: {}\r\n", e);
        return send_response(writer, response.as_bytes()).await;
    }
    drop(data_socket);

    info!("File stored: {:?}", file_path);
    send_response(writer, b"226 Closing data connection.\r\n").await?;
    send_response(writer, b"250 Requested file action okay, completed.\r\n").await
}
