use crate::core_ftpcommand::utils::{send_response, ControlWriter};
use crate::session::{Session, SessionState};
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the USER command while the session is identifying.
///
/// Stores the username and moves the session to the authenticating phase;
/// the actual credential check happens on PASS.
pub async fn handle_user_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
    username: String,
) -> Result<(), std::io::Error> {
    info!("Received USER command with username: {}", username);

    {
        let mut session = session.lock().await;
        session.username = Some(username);
        session.state = SessionState::Authenticating;
    }

    send_response(writer, b"331 Please authenticate using PASS.\r\n").await
}
