use crate::config::Config;
use crate::core_event::ServerObserver;
use crate::core_network::network::{self, SessionRegistry};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::net::TcpListener;
use tokio::sync::watch;

/// One FTP server instance: the listening socket, the live-session
/// registry and the registered lifecycle observer.
///
/// Construct it with [`FtpServer::bind`], grab a [`ServerHandle`] for
/// later control, then drive it with [`FtpServer::run`]. `run` returns
/// once [`ServerHandle::stop`] fires, after every session has been
/// forcibly disconnected.
pub struct FtpServer {
    config: Arc<Config>,
    observer: Arc<dyn ServerObserver>,
    listener: TcpListener,
    start_dir: Arc<RwLock<PathBuf>>,
    sessions: SessionRegistry,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl FtpServer {
    /// Binds the listening socket described by the configuration.
    pub async fn bind(config: Config, observer: Arc<dyn ServerObserver>) -> Result<Self> {
        let addr = format!(
            "{}:{}",
            config.server.listen_address, config.server.listen_port
        );
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind listening socket on {}", addr))?;

        let start_dir = Arc::new(RwLock::new(PathBuf::from(&config.server.start_dir)));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config: Arc::new(config),
            observer,
            listener,
            start_dir,
            sessions: SessionRegistry::new(),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// The address the server actually listens on. Useful when the
    /// configured port is 0.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// A cloneable control handle for stopping the server and changing
    /// the start directory of future sessions.
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown_tx: self.shutdown_tx.clone(),
            start_dir: Arc::clone(&self.start_dir),
        }
    }

    /// Runs the accept loop until the server is stopped.
    pub async fn run(self) -> Result<()> {
        network::serve(
            self.listener,
            self.config,
            self.start_dir,
            self.observer,
            self.sessions,
            self.shutdown_rx,
        )
        .await
    }
}

/// Remote control for a running [`FtpServer`].
#[derive(Clone)]
pub struct ServerHandle {
    shutdown_tx: watch::Sender<bool>,
    start_dir: Arc<RwLock<PathBuf>>,
}

impl ServerHandle {
    /// Stops the server: the listening socket closes and every live
    /// session is forcibly disconnected.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Sets the initial working directory handed to sessions accepted
    /// from now on. Already-connected sessions keep theirs.
    pub fn set_start_dir(&self, dir: impl Into<PathBuf>) {
        *self.start_dir.write().expect("start_dir lock poisoned") = dir.into();
    }
}
