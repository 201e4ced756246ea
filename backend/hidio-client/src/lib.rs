//! Client core for the HID-IO Core daemon.
//!
//! This crate implements the resilient, auto-reconnecting session layer a
//! desktop client needs to talk to a local HID-IO Core daemon:
//!
//! - [`transport`]: the seam to the external RPC client library (connect,
//!   disconnect, capability calls, daemon pushes)
//! - [`session`]: the reconnecting session state machine
//! - [`worker`]: background execution of the session loop plus the
//!   consumer-facing control surface and event subscription
//! - [`config`]: persisted client configuration
//!
//! The GUI layer attaches exclusively through [`worker::HidioWorker`]; it
//! never reaches into session internals.

pub mod config;
pub mod error;
pub mod session;
pub mod transport;
pub mod worker;

#[cfg(test)]
mod tests;

use std::time::Duration;

/// Display name this client registers with the daemon.
pub const CLIENT_NAME: &str = "HID-IO Client";

/// Hostname the daemon's RPC endpoint listens on.
pub const CORE_HOSTNAME: &str = "localhost";

/// Default HID-IO Core RPC port.
pub const CORE_PORT: u16 = 7185;

/// Default daemon address handed to the transport layer.
pub const CORE_ADDRESS: &str = const_format::concatcp!(CORE_HOSTNAME, ":", CORE_PORT);

/// Fixed interval between reconnect checks.
///
/// Deliberately a short constant poll rather than exponential backoff: the
/// daemon is local, so reconnect latency stays bounded and predictable.
pub const RETRY_POLL_INTERVAL: Duration = Duration::from_millis(10);
