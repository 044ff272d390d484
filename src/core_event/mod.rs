use log::{error, info};

/// Lifecycle notifications emitted by the server engine.
///
/// The host registers one observer at construction time and receives a
/// callback per event. The engine makes no assumption about what the
/// observer does with an event and never waits on it, so implementations
/// that need to block (queues, displays, telemetry) must hand the event
/// off themselves.
pub trait ServerObserver: Send + Sync {
    fn server_started(&self) {}
    fn server_stopped(&self) {}
    /// `peer` is the client's IP address rendered as text.
    fn client_connected(&self, _peer: &str) {}
    fn client_disconnected(&self, _peer: &str) {}
    fn error(&self, _detail: &str) {}
}

/// Default observer that forwards every lifecycle event to the `log` crate.
#[derive(Debug, Default)]
pub struct LogObserver;

impl ServerObserver for LogObserver {
    fn server_started(&self) {
        info!("Server started.");
    }

    fn server_stopped(&self) {
        info!("Server stopped.");
    }

    fn client_connected(&self, peer: &str) {
        info!("Client connected: {}", peer);
    }

    fn client_disconnected(&self, peer: &str) {
        info!("Client disconnected: {}", peer);
    }

    fn error(&self, detail: &str) {
        error!("Server error: {}", detail);
    }
}
