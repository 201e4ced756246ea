//! Session lifecycle events.
//!
//! [`SessionEvent`] is the sole channel of information flowing from the
//! session state machine to any consumer (tray UI, log viewer, tests).
//! Events are delivered at most once and in emission order; the consumer
//! never reaches into session internals.

use crate::daemon::DaemonInfo;
use crate::node::NodeDescriptor;

use serde::{Deserialize, Serialize};

/// A single notification from the session state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Worker started; the client serial has been generated but no
    /// connection attempt has been made yet.
    Initiated { serial: String },

    /// A connection (and handshake) to the daemon succeeded.
    ///
    /// `nodes` is the snapshot fetched right after an authenticated
    /// handshake; it is empty for unauthenticated sessions.
    Connected {
        daemon: DaemonInfo,
        nodes: Vec<NodeDescriptor>,
    },

    /// The daemon pushed a new node snapshot. Replaces any prior snapshot
    /// atomically from the consumer's point of view.
    NodesUpdated { nodes: Vec<NodeDescriptor> },

    /// The connection to the daemon was lost (or an attempt failed).
    Disconnected,

    /// One line of daemon-side log text, in arrival order.
    CoreLogEntry { line: String },

    /// The session loop has terminated. Exit code 0 for a clean stop,
    /// non-zero for stop-after-fatal-error. Always the last event.
    Finished { exit_code: i32 },
}
