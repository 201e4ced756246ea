//! In-process simulated HID-IO Core daemon.
//!
//! [`SimCore`] implements [`CoreTransport`] without any wire protocol. Each
//! connection attempt consumes the next [`SimAttempt`] from a script (falling
//! back to a repeat attempt once the script runs out), and the paired
//! [`SimRemote`] lets a test or demo harness act as the daemon: push log
//! lines, push node snapshots, or drop the connection.
//!
//! Used by the integration tests and by the `hidio-tray` demo binary until
//! the real RPC transport is wired in.

use crate::error::connect::ConnectError;
use crate::transport::{AuthLevel, AuthenticatedCapability, Capability, CorePush, CoreTransport};

use models::{DaemonInfo, ErrorLocation, NodeDescriptor};

use std::collections::VecDeque;
use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::debug;
use tokio::sync::mpsc;

/// Push channel depth per simulated connection.
const SIM_PUSH_BUFFER: usize = 32;

const DEFAULT_DAEMON_NAME: &str = "daemonName";
const DEFAULT_DAEMON_VERSION: &str = "1.0.0";

/// Outcome of one scripted connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimAttempt {
    /// Handshake succeeds at the requested auth level.
    Accept,

    /// Transport-level refusal (daemon not reachable).
    Refuse,

    /// Transport connects but the handshake is rejected.
    RejectAuth,

    /// Unrecoverable configuration failure.
    Fatal,
}

/// Shared state between [`SimCore`] and [`SimRemote`].
struct SimShared {
    /// Sender half of the current live connection's push channel.
    uplink: Mutex<Option<mpsc::Sender<CorePush>>>,
    connect_attempts: AtomicUsize,
    log_stream_resets: AtomicUsize,
}

/// Builder for a simulated daemon.
pub struct SimCoreBuilder {
    daemon: DaemonInfo,
    nodes: Vec<NodeDescriptor>,
    script: VecDeque<SimAttempt>,
    repeat: SimAttempt,
}

impl SimCoreBuilder {
    pub fn new() -> Self {
        Self {
            daemon: DaemonInfo {
                name: String::from(DEFAULT_DAEMON_NAME),
                version: String::from(DEFAULT_DAEMON_VERSION),
            },
            nodes: Vec::new(),
            script: VecDeque::new(),
            repeat: SimAttempt::Accept,
        }
    }

    /// Set the daemon identity reported on successful handshakes.
    pub fn daemon(mut self, name: &str, version: &str) -> Self {
        self.daemon = DaemonInfo {
            name: String::from(name),
            version: String::from(version),
        };
        self
    }

    /// Set the node snapshot returned by `nodes()`.
    pub fn nodes(mut self, nodes: Vec<NodeDescriptor>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Append one scripted connection attempt.
    pub fn attempt(mut self, attempt: SimAttempt) -> Self {
        self.script.push_back(attempt);
        self
    }

    /// Outcome for attempts made after the script is exhausted.
    /// Defaults to [`SimAttempt::Accept`].
    pub fn repeat(mut self, attempt: SimAttempt) -> Self {
        self.repeat = attempt;
        self
    }

    pub fn build(self) -> (SimCore, SimRemote) {
        let shared = Arc::new(SimShared {
            uplink: Mutex::new(None),
            connect_attempts: AtomicUsize::new(0),
            log_stream_resets: AtomicUsize::new(0),
        });

        let core = SimCore {
            daemon: self.daemon,
            nodes: self.nodes,
            script: self.script,
            repeat: self.repeat,
            alive: true,
            shared: Arc::clone(&shared),
        };

        (core, SimRemote { shared })
    }
}

impl Default for SimCoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulated daemon transport.
pub struct SimCore {
    daemon: DaemonInfo,
    nodes: Vec<NodeDescriptor>,
    script: VecDeque<SimAttempt>,
    repeat: SimAttempt,
    alive: bool,
    shared: Arc<SimShared>,
}

#[async_trait]
impl CoreTransport for SimCore {
    async fn connect(&mut self, auth: AuthLevel) -> Result<Capability, ConnectError> {
        self.shared.connect_attempts.fetch_add(1, Ordering::SeqCst);

        let attempt = self.script.pop_front().unwrap_or(self.repeat);
        debug!("Simulated connect attempt: {attempt:?} (auth {auth:?})");

        match attempt {
            SimAttempt::Refuse => Err(ConnectError::Transport {
                message: String::from("connection refused (simulated)"),
                location: ErrorLocation::from(Location::caller()),
            }),
            SimAttempt::RejectAuth => Err(ConnectError::Auth {
                message: String::from("handshake rejected (simulated)"),
                location: ErrorLocation::from(Location::caller()),
            }),
            SimAttempt::Fatal => {
                self.alive = false;
                Err(ConnectError::FatalConfig {
                    message: String::from("malformed client identity (simulated)"),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            SimAttempt::Accept => {
                let (push_tx, push_rx) = mpsc::channel(SIM_PUSH_BUFFER);

                if let Ok(mut uplink) = self.shared.uplink.lock() {
                    *uplink = Some(push_tx);
                }

                let authenticated: Option<Box<dyn AuthenticatedCapability>> = match auth {
                    AuthLevel::None => None,
                    AuthLevel::Basic | AuthLevel::Admin => Some(Box::new(SimAuthenticated {
                        nodes: self.nodes.clone(),
                        shared: Arc::clone(&self.shared),
                    })),
                };

                Ok(Capability {
                    daemon: self.daemon.clone(),
                    auth: authenticated,
                    pushes: push_rx,
                })
            }
        }
    }

    async fn disconnect(&mut self) {
        if let Ok(mut uplink) = self.shared.uplink.lock() {
            // Dropping the sender closes the push channel
            uplink.take();
        }
        self.alive = false;
    }

    fn retry_connection_status(&self) -> bool {
        self.alive
    }
}

/// Authenticated tier of a simulated connection.
struct SimAuthenticated {
    nodes: Vec<NodeDescriptor>,
    shared: Arc<SimShared>,
}

#[async_trait]
impl AuthenticatedCapability for SimAuthenticated {
    async fn nodes(&self) -> Result<Vec<NodeDescriptor>, ConnectError> {
        Ok(self.nodes.clone())
    }

    async fn restart_log_stream(&self) -> Result<(), ConnectError> {
        self.shared.log_stream_resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Daemon-side driver for a [`SimCore`].
///
/// Cloneable; all clones share the same simulated daemon.
#[derive(Clone)]
pub struct SimRemote {
    shared: Arc<SimShared>,
}

impl SimRemote {
    fn current_uplink(&self) -> Option<mpsc::Sender<CorePush>> {
        self.shared.uplink.lock().ok().and_then(|u| u.clone())
    }

    /// Push one daemon log line. Returns false if no connection is live.
    pub async fn push_log_line(&self, line: &str) -> bool {
        match self.current_uplink() {
            Some(tx) => tx.send(CorePush::LogLine(String::from(line))).await.is_ok(),
            None => false,
        }
    }

    /// Push a node snapshot update. Returns false if no connection is live.
    pub async fn push_nodes(&self, nodes: Vec<NodeDescriptor>) -> bool {
        match self.current_uplink() {
            Some(tx) => tx.send(CorePush::NodesUpdated(nodes)).await.is_ok(),
            None => false,
        }
    }

    /// Drop the live connection, as if the daemon went away.
    ///
    /// Already-pushed items are still delivered before the session observes
    /// the closure.
    pub fn close_connection(&self) {
        if let Ok(mut uplink) = self.shared.uplink.lock() {
            uplink.take();
        }
    }

    /// Total connection attempts made against this simulated daemon.
    pub fn connect_attempts(&self) -> usize {
        self.shared.connect_attempts.load(Ordering::SeqCst)
    }

    /// How many times the client asked to rewind the log stream.
    pub fn log_stream_resets(&self) -> usize {
        self.shared.log_stream_resets.load(Ordering::SeqCst)
    }
}
