use hidio_tray::error::TrayError;
use hidio_tray::logger::LOG_FILE_NAME;
use hidio_tray::logger::initialize as LoggerInitialize;

use hidio_client::config::ClientConfig;
use hidio_client::transport::sim::SimCoreBuilder;
use hidio_client::worker::HidioWorker;

use models::{ErrorLocation, SessionEvent};

use std::panic::Location;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{info, warn};
use tokio::signal::ctrl_c;

/// Config directory name under the platform config root.
const CONFIG_DIR_NAME: &str = "hidio";

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Mirror a session event into the log, the way the tray UI consumes them.
fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::Initiated { serial } => info!("Client initiated as {serial}"),
        SessionEvent::Connected { daemon, nodes } => {
            info!("Connected to {daemon}");
            for node in nodes {
                info!("  {node}");
            }
        }
        SessionEvent::NodesUpdated { nodes } => {
            info!("Nodes updated ({} nodes)", nodes.len());
            for node in nodes {
                info!("  {node}");
            }
        }
        SessionEvent::Disconnected => info!("Daemon disconnected"),
        SessionEvent::CoreLogEntry { line } => info!("core: {line}"),
        SessionEvent::Finished { .. } => {}
    }
}

async fn run() -> Result<i32, TrayError> {
    let log_dir = std::env::temp_dir();
    LoggerInitialize(&log_dir)?;

    info!("---------------------------- hid-io starting! ----------------------------");
    info!("Log file: {}", log_dir.join(LOG_FILE_NAME).display());

    let config = ClientConfig::load_or_default(&config_dir());
    info!(
        "Core address {} (auth {:?}, retry {:?})",
        config.core_address,
        config.auth_level,
        config.retry_interval()
    );

    // The real Cap'n Proto transport plugs in here; the simulated daemon
    // keeps the launcher runnable without a local HID-IO Core.
    let (core, _remote) = SimCoreBuilder::new().build();

    let mut worker = HidioWorker::new(Box::new(core), config.auth_level, config.retry_interval());
    let mut events = worker.events().ok_or_else(|| TrayError::Core {
        message: String::from("event stream already taken"),
        location: ErrorLocation::from(Location::caller()),
    })?;
    worker.start();

    loop {
        tokio::select! {
            _ = ctrl_c() => {
                warn!("Ctrl+C detected, exiting...");
                worker.stop();
            }
            event = events.recv() => match event {
                Some(SessionEvent::Finished { .. }) | None => break,
                Some(event) => log_event(&event),
            },
        }
    }

    let exit_code = worker.join().await;

    info!("Exiting with returncode: {exit_code}");
    info!("---------------------------- hid-io exiting! ----------------------------");
    Ok(exit_code)
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(exit_code) => ExitCode::from(exit_code.clamp(0, u8::MAX as i32) as u8),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
