use crate::config::Config;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::utils::{send_response, ControlWriter};
use crate::core_ftpcommand::{
    cdup, cwd, dele, list, mkd, noop, pass, pwd, retr, rmd, rnfr, rnto, stor, stru, type_, user,
};
use crate::core_network::{pasv, port};
use crate::session::{Session, SessionState};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome of one executed command, reported to the connection loop.
///
/// `Unimplemented` marks a non-fatal per-command failure: the 502 reply
/// has already been sent and the session stays connected, but the caller
/// can surface it (the connection loop forwards it to the lifecycle
/// observer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Done,
    Unimplemented,
}

/// Dispatches one parsed command according to the session's
/// authentication phase.
///
/// Before login only USER and PASS do anything; every other command is
/// answered with a 530 and leaves the session untouched. An `Err` from
/// this function means the control socket itself failed and the session
/// must be torn down; per-command failures are replied to and absorbed.
pub async fn handle_command(
    writer: &ControlWriter,
    config: &Arc<Config>,
    session: &Arc<Mutex<Session>>,
    command: FtpCommand,
) -> Result<CommandStatus, std::io::Error> {
    let state = {
        let session = session.lock().await;
        session.state
    };

    match state {
        SessionState::Identifying => {
            let result = match command {
                FtpCommand::User(username) => {
                    user::handle_user_command(writer, session, username).await
                }
                _ => send_response(writer, b"530 Please login using USER and PASS command.\r\n").await,
            };
            result.map(|()| CommandStatus::Done)
        }
        SessionState::Authenticating => {
            let result = match command {
                FtpCommand::Pass(password) => {
                    pass::handle_pass_command(writer, session, password).await
                }
                _ => send_response(writer, b"530 Please use PASS to authenticate.\r\n").await,
            };
            result.map(|()| CommandStatus::Done)
        }
        SessionState::LoggedIn => handle_logged_in_command(writer, config, session, command).await,
    }
}

/// Executes a command for a logged-in session.
async fn handle_logged_in_command(
    writer: &ControlWriter,
    config: &Arc<Config>,
    session: &Arc<Mutex<Session>>,
    command: FtpCommand,
) -> Result<CommandStatus, std::io::Error> {
    let result = match command {
        FtpCommand::Pwd => pwd::handle_pwd_command(writer, session).await,
        FtpCommand::Cwd(path) => cwd::handle_cwd_command(writer, session, path).await,
        FtpCommand::Cdup => cdup::handle_cdup_command(writer, session).await,
        FtpCommand::Port(numbers) => port::handle_port_command(writer, session, numbers).await,
        FtpCommand::Pasv => pasv::handle_pasv_command(writer).await,
        FtpCommand::Retr(path) => retr::handle_retr_command(writer, config, session, path).await,
        FtpCommand::Stor(path) => stor::handle_stor_command(writer, config, session, path).await,
        FtpCommand::List(path) => list::handle_list_command(writer, config, session, path).await,
        FtpCommand::Dele(path) => dele::handle_dele_command(writer, session, path).await,
        FtpCommand::Rmd(path) => rmd::handle_rmd_command(writer, session, path).await,
        FtpCommand::Mkd(path) => mkd::handle_mkd_command(writer, session, path).await,
        FtpCommand::Rnfr(path) => rnfr::handle_rnfr_command(writer, session, path).await,
        FtpCommand::Rnto(path) => rnto::handle_rnto_command(writer, session, path).await,
        FtpCommand::Type(code) => type_::handle_type_command(writer, session, code).await,
        FtpCommand::Stru(code) => stru::handle_stru_command(writer, session, code).await,
        FtpCommand::Noop => noop::handle_noop_command(writer).await,
        FtpCommand::Invalid => send_response(writer, b"500 Invalid command.\r\n").await,
        // Recognized keywords without an implementation, USER/PASS after
        // login included. Non-fatal: the session stays connected.
        _ => {
            send_response(writer, b"502 Command parsed but not implemented yet.\r\n").await?;
            return Ok(CommandStatus::Unimplemented);
        }
    };
    result.map(|()| CommandStatus::Done)
}
