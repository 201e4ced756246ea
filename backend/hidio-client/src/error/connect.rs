use models::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;

use thiserror::Error as ThisError;

/// Errors reported by the transport layer during connect, handshake, or a
/// live session.
///
/// Everything except [`ConnectError::FatalConfig`] is recoverable: the
/// session absorbs it, emits `Disconnected`, and retries. Fatal errors
/// short-circuit the session to `Finished` with a failure code.
#[derive(Debug, ThisError)]
pub enum ConnectError {
    /// Transport refused, reset, or otherwise failed.
    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    /// Handshake rejected by the daemon.
    #[error("Auth Error: {message} {location}")]
    Auth {
        message: String,
        location: ErrorLocation,
    },

    /// Malformed response from the daemon.
    #[error("Protocol Error: {message} {location}")]
    Protocol {
        message: String,
        location: ErrorLocation,
    },

    /// Bad identity or auth configuration. Never retried.
    #[error("Fatal Config Error: {message} {location}")]
    FatalConfig {
        message: String,
        location: ErrorLocation,
    },
}

impl ConnectError {
    /// Fatal errors terminate the session instead of entering the retry loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConnectError::FatalConfig { .. })
    }
}

impl From<IoError> for ConnectError {
    #[track_caller]
    fn from(error: IoError) -> Self {
        ConnectError::Transport {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
