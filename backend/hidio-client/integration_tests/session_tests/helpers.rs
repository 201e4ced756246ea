//! Test helpers for session integration tests.
//!
//! Every test drives a [`HidioWorker`] against a scripted simulated daemon:
//! - `start_worker` wires builder -> worker -> subscribed event stream
//! - `next_event` receives with a timeout so a hung session fails the test
//!   instead of wedging it
//! - `drain_until_finished` collects the complete event tail after a stop

use hidio_client::transport::AuthLevel;
use hidio_client::transport::sim::{SimCoreBuilder, SimRemote};
use hidio_client::worker::{EventStream, HidioWorker};

use models::{NodeDescriptor, NodeType, SessionEvent};

use std::time::Duration;

use tokio::time::timeout;

/// Fast retry so reconnect tests run quickly.
pub const TEST_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Generous upper bound for any single event under scheduler jitter.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// The keyboard node from the reference scenario.
pub fn keyboard_node() -> NodeDescriptor {
    NodeDescriptor {
        node_type: NodeType::UsbKeyboard,
        name: String::from("K1"),
        serial: String::from("S1"),
        id: 1,
    }
}

/// Build the simulated daemon, start a worker against it, and subscribe.
pub fn start_worker(
    builder: SimCoreBuilder,
    auth: AuthLevel,
) -> (HidioWorker, EventStream, SimRemote) {
    let (core, remote) = builder.build();
    let mut worker = HidioWorker::new(Box::new(core), auth, TEST_RETRY_INTERVAL);
    let events = worker.events().expect("event stream already taken");
    worker.start();
    (worker, events, remote)
}

/// Receive the next event or fail the test after a timeout.
pub async fn next_event(events: &mut EventStream) -> SessionEvent {
    timeout(RECV_TIMEOUT, events.recv())
        .await
        .expect("timed out waiting for a session event")
        .expect("event stream closed unexpectedly")
}

/// Receive events (including the terminal `Finished`) until the stream
/// closes, then return everything seen.
pub async fn drain_until_closed(events: &mut EventStream) -> Vec<SessionEvent> {
    let mut seen = Vec::new();
    while let Ok(Some(event)) = timeout(RECV_TIMEOUT, events.recv()).await {
        seen.push(event);
    }
    seen
}

/// Skip forward to the first `Connected` event, failing on `Finished`.
pub async fn wait_for_connected(events: &mut EventStream) -> SessionEvent {
    loop {
        match next_event(events).await {
            event @ SessionEvent::Connected { .. } => return event,
            SessionEvent::Finished { exit_code } => {
                panic!("session finished (exit {exit_code}) before connecting")
            }
            _ => {}
        }
    }
}
