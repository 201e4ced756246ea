// Retry policy: fixed-interval reconnect, stop semantics, fatal errors.

use crate::session_tests::helpers::{
    drain_until_closed, next_event, start_worker, wait_for_connected,
};

use hidio_client::transport::AuthLevel;
use hidio_client::transport::sim::{SimAttempt, SimCoreBuilder};

use models::SessionEvent;

use std::time::Duration;

use tokio::time::sleep;

/// **VALUE**: Verifies an unreachable daemon produces an indefinite stream
/// of retry cycles until stop, then exactly one Finished and no further
/// attempts.
///
/// **WHY THIS MATTERS**: The daemon being down is the normal startup state
/// for this client (it launches at login). The session must retry forever at
/// the fixed interval, and a stop must actually end the loop - a retry
/// surviving stop would burn CPU for the process lifetime.
///
/// **BUG THIS CATCHES**: Would catch the loop giving up after N failures,
/// never sleeping between attempts, or the stop flag not being checked on
/// the retry path.
#[tokio::test]
async fn given_unreachable_daemon_then_retries_until_stop_then_one_finished() {
    // GIVEN: A daemon that refuses every attempt
    let builder = SimCoreBuilder::new().repeat(SimAttempt::Refuse);
    let (worker, mut events, remote) = start_worker(builder, AuthLevel::Basic);

    // Skip the Initiated event
    assert!(matches!(
        next_event(&mut events).await,
        SessionEvent::Initiated { .. }
    ));

    // THEN: Several Disconnected retry cycles arrive
    for _ in 0..5 {
        assert!(matches!(
            next_event(&mut events).await,
            SessionEvent::Disconnected
        ));
    }
    assert!(remote.connect_attempts() >= 5);

    // WHEN: Stopping
    worker.stop();
    let tail = drain_until_closed(&mut events).await;

    // THEN: Exactly one Finished ends the stream
    let finishes = tail
        .iter()
        .filter(|e| matches!(e, SessionEvent::Finished { .. }))
        .count();
    assert_eq!(finishes, 1, "tail: {tail:?}");

    // AND: No further attempts are made after Finished
    let attempts_at_finish = remote.connect_attempts();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(remote.connect_attempts(), attempts_at_finish);
}

/// **VALUE**: Verifies a rejected handshake is retried at the same auth
/// level and can succeed on a later attempt.
///
/// **WHY THIS MATTERS**: Core may briefly reject handshakes while it
/// finishes starting up. Auth rejection is recoverable by design; the
/// session must neither downgrade the auth level nor give up.
#[tokio::test]
async fn given_auth_rejected_once_then_retries_and_connects() {
    // GIVEN: One rejected handshake, then acceptance
    let builder = SimCoreBuilder::new()
        .attempt(SimAttempt::RejectAuth)
        .attempt(SimAttempt::Accept);
    let (worker, mut events, remote) = start_worker(builder, AuthLevel::Basic);

    // Skip Initiated
    next_event(&mut events).await;

    // THEN: The rejection surfaces as a Disconnected, never an error
    assert!(matches!(
        next_event(&mut events).await,
        SessionEvent::Disconnected
    ));

    // AND: The next attempt connects
    wait_for_connected(&mut events).await;
    assert_eq!(remote.connect_attempts(), 2);

    worker.stop();
}

/// **VALUE**: Verifies fatal configuration errors terminate the session
/// immediately with a failure exit code.
///
/// **WHY THIS MATTERS**: A malformed identity or auth misconfiguration will
/// fail identically forever; retrying would hide the defect. Finished with a
/// non-zero code is the only consumer-visible failure channel.
///
/// **BUG THIS CATCHES**: Would catch fatal errors being folded into the
/// ordinary Disconnected/retry path.
#[tokio::test]
async fn given_fatal_config_error_then_finished_nonzero_without_retry() {
    // GIVEN: A transport that fails fatally on the first attempt
    let builder = SimCoreBuilder::new().attempt(SimAttempt::Fatal);
    let (_worker, mut events, remote) = start_worker(builder, AuthLevel::Basic);

    // Skip Initiated
    assert!(matches!(
        next_event(&mut events).await,
        SessionEvent::Initiated { .. }
    ));

    // THEN: The very next event is Finished with a failure code
    match next_event(&mut events).await {
        SessionEvent::Finished { exit_code } => assert_ne!(exit_code, 0),
        other => panic!("expected Finished, got {other:?}"),
    }

    // AND: No retry was attempted
    assert_eq!(remote.connect_attempts(), 1);
}

/// **VALUE**: Verifies stop() before any connection succeeds still produces
/// a clean Finished.
///
/// **WHY THIS MATTERS**: Quitting the client while the daemon is down is an
/// everyday flow; it must not hang waiting for a connection or report a
/// failure exit code.
#[tokio::test]
async fn given_never_connected_session_when_stopped_then_clean_finish() {
    // GIVEN: An unreachable daemon
    let builder = SimCoreBuilder::new().repeat(SimAttempt::Refuse);
    let (worker, mut events, _remote) = start_worker(builder, AuthLevel::Basic);

    // WHEN: Stopping during the retry loop
    next_event(&mut events).await; // Initiated
    worker.stop();

    // THEN: The stream ends with a clean Finished
    let tail = drain_until_closed(&mut events).await;
    assert_eq!(tail.last(), Some(&SessionEvent::Finished { exit_code: 0 }));
}
