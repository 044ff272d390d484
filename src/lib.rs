//! A small embeddable FTP server implementing a subset of RFC 959.
//!
//! The server speaks active-mode FTP only, accepts any username/password
//! pair and exposes a configured start directory to standard FTP clients.
//! Lifecycle events (started, stopped, client connected/disconnected,
//! errors) are delivered to an injected [`ServerObserver`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use uftpd::{Config, FtpServer, LogObserver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = FtpServer::bind(Config::default(), Arc::new(LogObserver)).await?;
//!     let handle = server.handle();
//!     handle.set_start_dir("/srv/ftp");
//!     server.run().await
//! }
//! ```

pub mod config;
pub mod constants;
pub mod core_event;
pub mod core_ftpcommand;
pub mod core_network;
pub mod server;
pub mod session;

pub use config::{Config, ServerConfig};
pub use core_event::{LogObserver, ServerObserver};
pub use server::{FtpServer, ServerHandle};
pub use session::{Session, SessionState};
