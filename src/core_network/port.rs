use crate::core_ftpcommand::utils::{send_response, ControlWriter};
use crate::session::Session;
use log::info;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the PORT (active mode) command.
///
/// The six parsed bytes are the client's IPv4 address octets followed by
/// the data port's high and low byte. The address is only stored on the
/// session; the actual connect happens when a transfer command opens the
/// data connection.
pub async fn handle_port_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
    numbers: [u8; 6],
) -> Result<(), std::io::Error> {
    let ip = Ipv4Addr::new(numbers[0], numbers[1], numbers[2], numbers[3]);
    let port = u16::from(numbers[4]) << 8 | u16::from(numbers[5]);

    info!("PORT set to {}:{}", ip, port);
    session.lock().await.data_addr = SocketAddr::new(IpAddr::V4(ip), port);

    send_response(writer, b"200 PORT was set.\r\n").await
}
