//! Reconnecting session state machine.
//!
//! One [`Session`] spans a logical client lifetime: possibly many
//! reconnects, bounded by worker start and stop. The loop is
//! poll-based with a fixed short sleep between retry checks, so reconnect
//! latency to the local daemon stays bounded.
//!
//! ```text
//! Idle -> Connecting -> Connected/Authenticated -> Disconnected
//!          ^                                          |
//!          +---------------- retry -------------------+
//!                      ... -> Disconnecting -> Stopped
//! ```
//!
//! The session owns its [`ConnectionHandle`] and state exclusively; the only
//! cross-context surface is the outbound `SessionEvent` channel, which never
//! blocks the loop.

pub mod connection;
pub mod identity;

pub use connection::ConnectionHandle;
pub use identity::ClientIdentity;

use crate::transport::{AuthLevel, Capability, CorePush, CoreTransport};
use crate::worker::ControlCommand;

use models::SessionEvent;

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::sleep;

/// Exit code reported through `SessionEvent::Finished` on a clean stop.
pub const EXIT_CLEAN: i32 = 0;

/// Exit code reported when the session terminates on a fatal error.
pub const EXIT_FATAL: i32 = 1;

/// Connection lifecycle state.
///
/// Exactly one instance lives per session, mutated only inside the session
/// loop; transitions are serialized by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    Authenticated,
    Disconnected,
    Disconnecting,
    Stopped,
}

/// The session state machine.
///
/// Constructed by the worker, then moved onto the background task and run to
/// completion via [`Session::run`].
pub struct Session {
    identity: ClientIdentity,
    auth_level: AuthLevel,
    retry_interval: Duration,
    handle: ConnectionHandle,
    state: ConnectionState,
    events: mpsc::UnboundedSender<SessionEvent>,
    control: mpsc::UnboundedReceiver<ControlCommand>,
    stop_requested: bool,
}

impl Session {
    pub fn new(
        transport: Box<dyn CoreTransport>,
        auth_level: AuthLevel,
        retry_interval: Duration,
        events: mpsc::UnboundedSender<SessionEvent>,
        control: mpsc::UnboundedReceiver<ControlCommand>,
    ) -> Self {
        Self {
            identity: ClientIdentity::generate(),
            auth_level,
            retry_interval,
            handle: ConnectionHandle::new(transport),
            state: ConnectionState::Idle,
            events,
            control,
            stop_requested: false,
        }
    }

    /// Clone of the outbound event sender, for the worker's panic guard.
    pub(crate) fn events_handle(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.events.clone()
    }

    /// Drive the session until a stop command or a fatal error.
    ///
    /// Always emits `Finished` as the final event; returns the same exit
    /// code it reported there.
    pub async fn run(mut self) -> i32 {
        info!("Session starting as {}", self.identity);
        self.emit(SessionEvent::Initiated {
            serial: String::from(self.identity.serial()),
        });

        let exit_code = self.drive().await;

        self.set_state(ConnectionState::Stopped);
        info!("Session stopped (exit code {exit_code})");
        self.emit(SessionEvent::Finished { exit_code });
        exit_code
    }

    /// The connect/retry loop.
    async fn drive(&mut self) -> i32 {
        loop {
            self.poll_control();

            if self.stop_requested || !self.handle.retry_connection_status() {
                self.set_state(ConnectionState::Disconnecting);
                self.handle.disconnect().await;
                return EXIT_CLEAN;
            }

            self.set_state(ConnectionState::Connecting);
            match self.handle.connect(self.auth_level).await {
                Ok(capability) => self.serve_connection(capability).await,
                Err(err) if err.is_fatal() => {
                    error!("Fatal connection error: {err}");
                    self.handle.disconnect().await;
                    return EXIT_FATAL;
                }
                Err(err) => {
                    warn!("Connection attempt failed: {err}");
                    self.set_state(ConnectionState::Disconnected);
                    self.emit(SessionEvent::Disconnected);
                }
            }

            if !self.stop_requested {
                self.backoff().await;
            }
        }
    }

    /// Steady Connected phase: relay daemon pushes and control commands
    /// until the link drops or a stop arrives.
    async fn serve_connection(&mut self, mut capability: Capability) {
        // Node snapshot is fetched on every successful authenticated connect
        let nodes = match capability.auth.as_ref() {
            Some(auth) => match auth.nodes().await {
                Ok(nodes) => nodes,
                Err(err) => {
                    warn!("Node snapshot fetch failed: {err}");
                    self.set_state(ConnectionState::Disconnected);
                    self.emit(SessionEvent::Disconnected);
                    return;
                }
            },
            None => Vec::new(),
        };

        self.set_state(if capability.auth.is_some() {
            ConnectionState::Authenticated
        } else {
            ConnectionState::Connected
        });
        info!("Connected! ({}, {} nodes)", capability.daemon, nodes.len());
        self.emit(SessionEvent::Connected {
            daemon: capability.daemon.clone(),
            nodes,
        });

        loop {
            tokio::select! {
                push = capability.pushes.recv() => match push {
                    Some(CorePush::NodesUpdated(nodes)) => {
                        info!("Nodes update ({} nodes)", nodes.len());
                        self.emit(SessionEvent::NodesUpdated { nodes });
                    }
                    Some(CorePush::LogLine(line)) => {
                        self.emit(SessionEvent::CoreLogEntry { line });
                    }
                    Some(CorePush::Closed) | None => {
                        info!("Disconnected!");
                        self.set_state(ConnectionState::Disconnected);
                        self.emit(SessionEvent::Disconnected);
                        return;
                    }
                },
                command = self.control.recv() => match command {
                    Some(ControlCommand::Stop) | None => {
                        self.stop_requested = true;
                        self.set_state(ConnectionState::Disconnecting);
                        self.handle.disconnect().await;
                        self.set_state(ConnectionState::Disconnected);
                        self.emit(SessionEvent::Disconnected);
                        return;
                    }
                    Some(ControlCommand::ResetCoreLogPosition) => {
                        self.reset_log_position(&capability).await;
                        if self.state == ConnectionState::Disconnected {
                            return;
                        }
                    }
                },
            }
        }
    }

    /// Forward a log stream rewind to the daemon.
    ///
    /// A no-op (with a warning) on unauthenticated sessions; an RPC failure
    /// is treated like any mid-session failure and turns into a disconnect.
    async fn reset_log_position(&mut self, capability: &Capability) {
        match capability.auth.as_ref() {
            Some(auth) => {
                if let Err(err) = auth.restart_log_stream().await {
                    warn!("Log stream rewind failed: {err}");
                    self.set_state(ConnectionState::Disconnected);
                    self.emit(SessionEvent::Disconnected);
                }
            }
            None => warn!("Log stream rewind requested on an unauthenticated session; ignoring"),
        }
    }

    /// Fixed-interval wait between reconnect attempts, staying responsive to
    /// control commands.
    async fn backoff(&mut self) {
        tokio::select! {
            _ = sleep(self.retry_interval) => {}
            command = self.control.recv() => self.apply_control(command),
        }
    }

    /// Drain any control commands that arrived while not suspended.
    fn poll_control(&mut self) {
        loop {
            match self.control.try_recv() {
                Ok(command) => self.apply_control(Some(command)),
                Err(TryRecvError::Disconnected) => {
                    self.stop_requested = true;
                    return;
                }
                Err(TryRecvError::Empty) => return,
            }
        }
    }

    /// Handle a control command outside the Connected phase.
    ///
    /// A closed control channel (worker dropped) counts as a stop request.
    fn apply_control(&mut self, command: Option<ControlCommand>) {
        match command {
            Some(ControlCommand::Stop) | None => self.stop_requested = true,
            Some(ControlCommand::ResetCoreLogPosition) => {
                warn!("Log stream rewind requested while disconnected; ignoring");
            }
        }
    }

    fn set_state(&mut self, next: ConnectionState) {
        if self.state != next {
            debug!("Session state: {:?} -> {next:?}", self.state);
            self.state = next;
        }
    }

    /// Non-blocking event emission. A dropped subscriber never stalls the
    /// loop; the event is discarded.
    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!("Event subscriber dropped; discarding event");
        }
    }
}
