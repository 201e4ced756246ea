use crate::CLIENT_NAME;

use std::fmt::{Display, Formatter, Result as FormatResult};

use uuid::Uuid;

/// Opaque serial identifying this client instance to the daemon.
///
/// Generated once at worker start; immutable for the session's lifetime.
/// Used for display and for daemon-side deduplication of client instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    serial: String,
}

impl ClientIdentity {
    /// Generate a fresh serial: the client display name plus a v4 uuid.
    pub fn generate() -> Self {
        Self {
            serial: format!("{CLIENT_NAME} {}", Uuid::new_v4()),
        }
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }
}

impl Display for ClientIdentity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "{}", self.serial)
    }
}
