// Unit tests for the single-attempt connection handle
// Full session behavior is covered in integration_tests/

use crate::error::connect::ConnectError;
use crate::session::connection::ConnectionHandle;
use crate::transport::{AuthLevel, Capability, CoreTransport};

use models::{DaemonInfo, ErrorLocation};

use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Transport stub that counts teardown calls.
struct CountingTransport {
    disconnects: Arc<AtomicUsize>,
    alive: bool,
}

impl CountingTransport {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let disconnects = Arc::new(AtomicUsize::new(0));
        (
            Self {
                disconnects: Arc::clone(&disconnects),
                alive: true,
            },
            disconnects,
        )
    }
}

#[async_trait]
impl CoreTransport for CountingTransport {
    async fn connect(&mut self, _auth: AuthLevel) -> Result<Capability, ConnectError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(Capability {
            daemon: DaemonInfo {
                name: String::from("stub"),
                version: String::from("0.0.0"),
            },
            auth: None,
            pushes: rx,
        })
    }

    async fn disconnect(&mut self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.alive = false;
    }

    fn retry_connection_status(&self) -> bool {
        self.alive
    }
}

/// Transport stub whose retry status can be preloaded.
struct FailingTransport;

#[async_trait]
impl CoreTransport for FailingTransport {
    async fn connect(&mut self, _auth: AuthLevel) -> Result<Capability, ConnectError> {
        Err(ConnectError::Transport {
            message: String::from("refused"),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    async fn disconnect(&mut self) {}

    fn retry_connection_status(&self) -> bool {
        true
    }
}

/// **VALUE**: Verifies disconnect() is idempotent.
///
/// **WHY THIS MATTERS**: The session loop tears the handle down both on stop
/// and at loop exit; the second call must be a no-op, not an error and not a
/// second transport teardown.
///
/// **BUG THIS CATCHES**: Would catch removal of the `closed` guard, which
/// would double-close the transport.
#[tokio::test]
async fn given_closed_handle_when_disconnect_again_then_noop() {
    // GIVEN: A handle over a counting transport
    let (transport, disconnects) = CountingTransport::new();
    let mut handle = ConnectionHandle::new(Box::new(transport));

    // WHEN: Disconnecting twice
    handle.disconnect().await;
    handle.disconnect().await;

    // THEN: The transport saw exactly one teardown
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    assert!(handle.is_closed());
}

/// **VALUE**: Verifies retry_connection_status() goes false only after an
/// explicit, successful disconnect.
///
/// **WHY THIS MATTERS**: This flag is what keeps the reconnect loop alive; a
/// failed connect attempt must NOT flip it, or the session would silently
/// stop retrying.
#[tokio::test]
async fn given_failed_connect_when_status_checked_then_still_retrying() {
    // GIVEN: A handle over an always-refusing transport
    let mut handle = ConnectionHandle::new(Box::new(FailingTransport));

    // WHEN: A connect attempt fails
    let result = handle.connect(AuthLevel::Basic).await;
    assert!(result.is_err());

    // THEN: The loop should keep driving retries
    assert!(handle.retry_connection_status());

    // AND: After an explicit disconnect it should not
    handle.disconnect().await;
    assert!(!handle.retry_connection_status());
}

/// **VALUE**: Verifies connecting on a torn-down handle is a fatal caller
/// bug, not a retriable failure.
///
/// **BUG THIS CATCHES**: Would catch the closed-handle check being dropped,
/// which would let a stopped session silently reconnect.
#[tokio::test]
async fn given_closed_handle_when_connect_then_fatal_error() {
    // GIVEN: A closed handle
    let (transport, _) = CountingTransport::new();
    let mut handle = ConnectionHandle::new(Box::new(transport));
    handle.disconnect().await;

    // WHEN: Attempting to connect anyway
    let result = handle.connect(AuthLevel::Basic).await;

    // THEN: The error is fatal (never retried)
    let Err(err) = result else {
        panic!("connect on a closed handle must fail");
    };
    assert!(err.is_fatal(), "expected a fatal error, got {err}");
}
