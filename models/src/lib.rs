//! Domain models for the HID-IO client.
//!
//! This crate contains pure data structures representing the core
//! concepts in our application. Models have no business logic - they're
//! just data that can be passed between layers.
//!
//! ## Architecture
//!
//! - **models** (this crate): Pure data structures
//! - **hidio-client**: Session/connection logic operating on models
//! - **hidio-tray**: Launcher wiring everything together
//!
//! This layered architecture keeps concerns separated and makes testing easier.

pub mod daemon;
pub mod error;
pub mod event;
pub mod node;

pub use daemon::DaemonInfo;
pub use error::error_location::ErrorLocation;
pub use event::SessionEvent;
pub use node::{NodeDescriptor, NodeType};

#[cfg(test)]
mod tests;
