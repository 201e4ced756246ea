pub mod config;
pub mod connect;

pub use config::ConfigError;
pub use connect::ConnectError;
