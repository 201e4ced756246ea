//! Seam to the external HID-IO Core RPC client library.
//!
//! The wire-level RPC and authentication protocol belongs to the external
//! client library; this module models only the calls the session loop
//! orchestrates: connect at an auth level, tear down, query nodes, and
//! receive daemon pushes.
//!
//! # Capability tiers
//!
//! A handshake at [`AuthLevel::None`] yields only the unauthenticated tier
//! (daemon identity); [`AuthLevel::Basic`] and [`AuthLevel::Admin`] add an
//! [`AuthenticatedCapability`] granting node access and log stream control.
//!
//! # Pushes
//!
//! Daemon-initiated notifications arrive on the [`Capability::pushes`]
//! channel. The sender side closing means the transport dropped; the session
//! treats that exactly like an explicit [`CorePush::Closed`].

pub mod sim;

use crate::error::connect::ConnectError;

use models::{DaemonInfo, NodeDescriptor};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Authentication strength requested for a connection attempt.
///
/// Chosen once per session lifetime; not renegotiated mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthLevel {
    None,
    Basic,
    Admin,
}

impl Default for AuthLevel {
    fn default() -> Self {
        AuthLevel::Basic
    }
}

/// A daemon-initiated notification on a live connection.
#[derive(Debug, Clone, PartialEq)]
pub enum CorePush {
    /// New node snapshot; replaces the prior set.
    NodesUpdated(Vec<NodeDescriptor>),

    /// One line of daemon log text, in arrival order.
    LogLine(String),

    /// The daemon closed the connection.
    Closed,
}

/// Authenticated tier of a capability.
#[async_trait]
pub trait AuthenticatedCapability: Send + Sync {
    /// Fetch the current node snapshot from the daemon.
    async fn nodes(&self) -> Result<Vec<NodeDescriptor>, ConnectError>;

    /// Rewind the daemon log subscription to the start of the stream.
    async fn restart_log_stream(&self) -> Result<(), ConnectError>;
}

/// A live connection yielded by a successful handshake.
pub struct Capability {
    /// Daemon identity reported during the handshake.
    pub daemon: DaemonInfo,

    /// Authenticated tier. `None` when the handshake ran at
    /// [`AuthLevel::None`]: identity queries only, no node access.
    pub auth: Option<Box<dyn AuthenticatedCapability>>,

    /// Daemon pushes for this connection's lifetime.
    pub pushes: mpsc::Receiver<CorePush>,
}

/// Contract the external RPC client library must satisfy.
///
/// Implemented by the real Cap'n Proto transport (out of scope here) and by
/// [`sim::SimCore`] for development and tests.
#[async_trait]
pub trait CoreTransport: Send + 'static {
    /// Attempt a transport-level connection plus handshake at `auth`.
    async fn connect(&mut self, auth: AuthLevel) -> Result<Capability, ConnectError>;

    /// Tear down the transport deterministically.
    async fn disconnect(&mut self);

    /// Whether the owning loop should keep driving reconnect attempts.
    ///
    /// `false` only after an explicit, successful [`disconnect`] or a fatal
    /// unrecoverable error.
    ///
    /// [`disconnect`]: CoreTransport::disconnect
    fn retry_connection_status(&self) -> bool;
}
