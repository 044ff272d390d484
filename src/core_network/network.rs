use crate::config::Config;
use crate::core_event::ServerObserver;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{handle_command, CommandStatus};
use crate::core_ftpcommand::utils::{send_response, ControlWriter};
use crate::session::Session;
use anyhow::Result;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;

/// Registry of live control connections, keyed by an opaque id.
///
/// Only the accept loop and the per-connection tasks touch it: insert on
/// accept, remove on disconnect, drain on shutdown.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<StdMutex<HashMap<u64, SocketAddr>>>,
    next_id: Arc<AtomicU64>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, peer: SocketAddr) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .lock()
            .expect("session registry lock poisoned")
            .insert(id, peer);
        id
    }

    fn remove(&self, id: u64) -> Option<SocketAddr> {
        self.inner
            .lock()
            .expect("session registry lock poisoned")
            .remove(&id)
    }

    fn drain(&self) -> Vec<SocketAddr> {
        self.inner
            .lock()
            .expect("session registry lock poisoned")
            .drain()
            .map(|(_, peer)| peer)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("session registry lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accept loop of the server.
///
/// Each accepted control connection runs on its own task; the registry
/// tracks them for lifecycle notifications and the shutdown signal tears
/// all of them down when `stop` fires. An accept failure is reported to
/// the observer and logged, but does not stop the server.
pub async fn serve(
    listener: TcpListener,
    config: Arc<Config>,
    start_dir: Arc<RwLock<PathBuf>>,
    observer: Arc<dyn ServerObserver>,
    sessions: SessionRegistry,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    info!("Server listening on {}", listener.local_addr()?);
    observer.server_started();

    let mut tasks = JoinSet::new();
    loop {
        tokio::select! {
            res = listener.accept() => {
                match res {
                    Ok((socket, peer)) => {
                        info!("New connection from {}", peer);
                        let id = sessions.insert(peer);
                        observer.client_connected(&peer.ip().to_string());

                        let config = Arc::clone(&config);
                        let observer = Arc::clone(&observer);
                        let sessions = sessions.clone();
                        let start_dir = start_dir
                            .read()
                            .expect("start_dir lock poisoned")
                            .clone();

                        tasks.spawn(async move {
                            if let Err(e) =
                                handle_connection(socket, peer, config, start_dir, Arc::clone(&observer))
                                    .await
                            {
                                warn!("Connection error for {}: {}", peer, e);
                                observer.error(&format!("FTP network error: {}", e));
                            }
                            sessions.remove(id);
                            observer.client_disconnected(&peer.ip().to_string());
                            info!("Connection closed for {}", peer);
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        observer.error(&format!("accept failed: {}", e));
                    }
                }
            }
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            _ = shutdown_rx.changed() => break,
        }
    }

    // Forcibly disconnect whatever is still alive, then report it.
    tasks.shutdown().await;
    for peer in sessions.drain() {
        observer.client_disconnected(&peer.ip().to_string());
    }
    observer.server_stopped();
    Ok(())
}

/// Command loop of one control connection.
///
/// Reads CRLF-terminated lines as raw bytes and decodes them lossily, so
/// garbage such as Telnet IAC prefixes lands on the invalid command and
/// gets the 500 reply instead of killing the session. Returns `Err` only
/// for control-socket I/O failures; command-level errors have already
/// been replied to by the handlers.
pub async fn handle_connection(
    socket: TcpStream,
    peer: SocketAddr,
    config: Arc<Config>,
    start_dir: PathBuf,
    observer: Arc<dyn ServerObserver>,
) -> Result<(), std::io::Error> {
    let (read_half, write_half) = socket.into_split();
    let writer: ControlWriter = Arc::new(Mutex::new(write_half));
    let mut reader = BufReader::new(read_half);

    send_response(&writer, b"220 uftpd server\r\n").await?;

    let session = Arc::new(Mutex::new(Session::new(start_dir, peer)));
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        let n = reader.read_until(b'\n', &mut buffer).await?;
        if n == 0 {
            debug!("Client {} closed the control connection", peer);
            break;
        }

        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim_end_matches(['\r', '\n']);
        debug!("Received command from {}: {:?}", peer, line);

        let command = FtpCommand::parse(line);
        match handle_command(&writer, &config, &session, command).await? {
            CommandStatus::Done => {}
            CommandStatus::Unimplemented => {
                observer.error(&format!("Command not implemented: {}", line));
            }
        }
    }

    Ok(())
}
