use models::ErrorLocation;

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the launcher layer.
///
/// Kept serializable so a future UI shell can ship them across an IPC
/// boundary as structured data instead of strings.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum TrayError {
    /// Launcher-local failure (logging, filesystem).
    #[error("Tray Error: {message} {location}")]
    Tray {
        message: String,
        location: ErrorLocation,
    },

    /// Failure surfaced from the session core.
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },
}
