//! Launcher layer for the HID-IO client.
//!
//! Owns process-wide conveniences the session core deliberately doesn't:
//! logger initialization and log-file catch-up reads. The actual tray UI is
//! a separate observer that attaches to `hidio_client::worker::HidioWorker`.

pub mod error;
pub mod logger;

#[cfg(test)]
mod tests;
