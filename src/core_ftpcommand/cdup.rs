use crate::core_ftpcommand::cwd::handle_cwd_command;
use crate::core_ftpcommand::utils::ControlWriter;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the CDUP command, which is CWD ".." by definition.
pub async fn handle_cdup_command(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
) -> Result<(), std::io::Error> {
    handle_cwd_command(writer, session, "..".to_string()).await
}
