//! Node descriptors reported by HID-IO Core.
//!
//! A node is a device or API endpoint the daemon reports availability for.
//! The daemon sends the full list as a value snapshot - there are no partial
//! updates, a new snapshot always replaces the prior set.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FormatResult};

/// Kind of node registered with the daemon.
///
/// Serialized with the daemon's wire names (`hidioApi`, `hidioDaemon`,
/// `usbKeyboard`). Unrecognized names deserialize to [`NodeType::Unknown`]
/// so newer daemons don't break older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "hidioApi")]
    ApiClient,

    #[serde(rename = "hidioDaemon")]
    Daemon,

    #[serde(rename = "usbKeyboard")]
    UsbKeyboard,

    #[serde(other, rename = "unknown")]
    Unknown,
}

impl Display for NodeType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let name = match self {
            NodeType::ApiClient => "hidioApi",
            NodeType::Daemon => "hidioDaemon",
            NodeType::UsbKeyboard => "usbKeyboard",
            NodeType::Unknown => "unknown",
        };
        write!(formatter, "{name}")
    }
}

/// Snapshot entry for a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    pub serial: String,
    pub id: u64,
}

impl Display for NodeDescriptor {
    /// Menu-style rendering: `[id] name (serial)`.
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "[{}] {} ({})", self.id, self.name, self.serial)
    }
}
