//! Single-attempt wrapper around the RPC transport.
//!
//! [`ConnectionHandle`] represents one outstanding attempt to reach the
//! daemon. The session loop owns exactly one handle; the handle owns the
//! transport exclusively, so all teardown is deterministic.

use crate::error::connect::ConnectError;
use crate::transport::{AuthLevel, Capability, CoreTransport};

use models::ErrorLocation;

use std::panic::Location;

use log::debug;

/// Exclusive wrapper over the external transport.
pub struct ConnectionHandle {
    transport: Box<dyn CoreTransport>,
    closed: bool,
}

impl ConnectionHandle {
    pub fn new(transport: Box<dyn CoreTransport>) -> Self {
        Self {
            transport,
            closed: false,
        }
    }

    /// Attempt a transport connection plus handshake at `auth`.
    ///
    /// # Errors
    ///
    /// Returns the transport's error for a failed attempt, or
    /// [`ConnectError::FatalConfig`] when called on a handle that was
    /// already torn down (a caller bug, never retried).
    pub async fn connect(&mut self, auth: AuthLevel) -> Result<Capability, ConnectError> {
        if self.closed {
            return Err(ConnectError::FatalConfig {
                message: String::from("connect() called on a closed connection handle"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.transport.connect(auth).await
    }

    /// Tear down the transport. Idempotent: calling this on an
    /// already-closed handle is a no-op, not an error.
    pub async fn disconnect(&mut self) {
        if self.closed {
            debug!("disconnect() on an already-closed handle; ignoring");
            return;
        }

        self.transport.disconnect().await;
        self.closed = true;
    }

    /// Whether the owning loop should keep driving reconnect attempts.
    pub fn retry_connection_status(&self) -> bool {
        !self.closed && self.transport.retry_connection_status()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
