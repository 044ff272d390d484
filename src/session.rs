use std::net::SocketAddr;
use std::path::PathBuf;

use crate::constants::DEFAULT_DATA_PORT;

/// Authentication phase of a control connection. A session only ever
/// moves forward; nothing returns it to `Identifying` short of a fresh
/// connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Before the client submitted a username.
    Identifying,
    /// Username received, waiting for PASS.
    Authenticating,
    LoggedIn,
}

/// The data representation type used for transfer and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferType {
    Image,
    Ascii,
}

/// The data structure type used for transfer and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureType {
    File,
    Record,
    Page,
}

#[derive(Debug)]
pub struct Session {
    pub state: SessionState,
    pub username: Option<String>,
    /// Virtual working directory, always an absolute path.
    pub current_dir: PathBuf,
    pub transfer_type: TransferType,
    pub structure_type: StructureType,
    /// Address the server connects to for active-mode data transfers.
    /// Seeded from the control connection's peer, overridden by PORT.
    pub data_addr: SocketAddr,
    /// Pending rename source set by RNFR, consumed by RNTO.
    pub rename_from: Option<PathBuf>,
}

impl Session {
    pub fn new(start_dir: PathBuf, peer: SocketAddr) -> Self {
        Self {
            state: SessionState::Identifying,
            username: None,
            current_dir: start_dir,
            transfer_type: TransferType::Image,
            structure_type: StructureType::File,
            data_addr: SocketAddr::new(peer.ip(), DEFAULT_DATA_PORT),
            rename_from: None,
        }
    }
}
