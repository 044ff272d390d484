use crate::core_ftpcommand::utils::{send_response, ControlWriter};
use crate::session::{Session, SessionState};
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Credential check for the PASS command.
///
/// Accepts any username/password pair. A deployment that needs real
/// authentication replaces this function; the surrounding state machine
/// does not change shape.
fn check_login(_username: &str, _password: &str) -> bool {
    true
}

/// Handles the PASS command while the session is authenticating.
pub async fn handle_pass_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
    password: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    let username = session.username.clone().unwrap_or_default();

    if check_login(&username, &password) {
        info!("User {} logged in", username);
        session.state = SessionState::LoggedIn;
        drop(session);
        send_response(writer, b"230 Login successful.\r\n").await
    } else {
        session.state = SessionState::Identifying;
        drop(session);
        send_response(writer, b"530 Wrong password.\r\n").await
    }
}
