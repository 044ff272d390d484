use crate::core_ftpcommand::utils::{send_response, ControlWriter};
use log::{debug, error};
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// Opens the active-mode data connection for a transfer.
///
/// The 150 reply goes out on the control channel before the outbound
/// connect is attempted, per RFC 959. On connect failure the error is
/// reported on the control channel and returned, so the calling command
/// aborts without any reply implying success.
///
/// Passive mode never reaches this point: PASV is answered as
/// unsupported before any transfer state exists (see `pasv.rs`).
pub async fn open_data_connection(
    writer: &ControlWriter,
    data_addr: SocketAddr,
) -> Result<TcpStream, std::io::Error> {
    send_response(
        writer,
        b"150 File status okay; about to open data connection.\r\n",
    )
    .await?;

    match TcpStream::connect(data_addr).await {
        Ok(socket) => {
            debug!("Data connection established with {}", data_addr);
            Ok(socket)
        }
        Err(e) => {
            error!("Failed to open data connection to {}: {}", data_addr, e);
            let response = format!("500 Connection error: {}\r\n", e);
            send_response(writer, response.as_bytes()).await?;
            Err(e)
        }
    }
}
