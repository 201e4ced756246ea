// Session lifecycle: connect, disconnect, reconnect, stop.

use crate::session_tests::helpers::{
    RECV_TIMEOUT, drain_until_closed, keyboard_node, next_event, start_worker, wait_for_connected,
};

use hidio_client::transport::AuthLevel;
use hidio_client::transport::sim::SimCoreBuilder;

use models::SessionEvent;

use tokio::time::timeout;

/// **VALUE**: Verifies the reference connect scenario end to end.
///
/// **WHY THIS MATTERS**: This is the one flow every consumer depends on:
/// worker start announces the client serial, then a Basic-auth connect
/// reports the daemon identity plus the node snapshot fetched during the
/// handshake.
///
/// **BUG THIS CATCHES**: Would catch the node snapshot being skipped on
/// connect, events arriving out of order, or the serial being generated per
/// attempt instead of per worker.
#[tokio::test]
async fn given_basic_auth_when_connected_then_initiated_then_connected_with_nodes() {
    // GIVEN: A daemon with one usb keyboard node
    let builder = SimCoreBuilder::new()
        .daemon("daemonName", "1.0.0")
        .nodes(vec![keyboard_node()]);
    let (worker, mut events, _remote) = start_worker(builder, AuthLevel::Basic);

    // WHEN: The worker runs
    // THEN: First event is Initiated with a non-empty serial
    match next_event(&mut events).await {
        SessionEvent::Initiated { serial } => assert!(!serial.is_empty()),
        other => panic!("expected Initiated, got {other:?}"),
    }

    // AND: Second event is Connected with the daemon identity and snapshot
    match next_event(&mut events).await {
        SessionEvent::Connected { daemon, nodes } => {
            assert_eq!(daemon.name, "daemonName");
            assert_eq!(daemon.version, "1.0.0");
            assert_eq!(nodes, vec![keyboard_node()]);
        }
        other => panic!("expected Connected, got {other:?}"),
    }

    worker.stop();
}

/// **VALUE**: Verifies a dropped daemon connection triggers Disconnected and
/// a fresh attempt.
///
/// **WHY THIS MATTERS**: Automatic reconnection is the whole point of the
/// session layer; losing the daemon must never require user action.
///
/// **BUG THIS CATCHES**: Would catch the loop treating a daemon-side close
/// as a stop, or never re-entering Connecting after a disconnect.
#[tokio::test]
async fn given_connected_session_when_daemon_closes_then_disconnected_then_reconnects() {
    // GIVEN: A connected session
    let (worker, mut events, remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);
    wait_for_connected(&mut events).await;
    let attempts_before = remote.connect_attempts();

    // WHEN: The daemon drops the connection
    remote.close_connection();

    // THEN: Disconnected is emitted
    loop {
        match next_event(&mut events).await {
            SessionEvent::Disconnected => break,
            SessionEvent::Finished { .. } => panic!("session finished instead of reconnecting"),
            _ => {}
        }
    }

    // AND: A new attempt connects again after the fixed backoff
    wait_for_connected(&mut events).await;
    assert!(
        remote.connect_attempts() > attempts_before,
        "expected a fresh connection attempt"
    );

    worker.stop();
}

/// **VALUE**: Verifies stop() is idempotent at the event level.
///
/// **WHY THIS MATTERS**: The tray wires its Exit action straight to stop();
/// double-clicks or a stop racing worker drop must still produce exactly one
/// Finished event, because consumers treat Finished as the quit trigger.
///
/// **BUG THIS CATCHES**: Would catch the loop emitting Finished per Stop
/// command instead of per session lifetime.
#[tokio::test]
async fn given_stop_called_twice_then_exactly_one_finished() {
    // GIVEN: A connected session
    let (worker, mut events, _remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);
    wait_for_connected(&mut events).await;

    // WHEN: Stopping twice
    worker.stop();
    worker.stop();

    // THEN: Exactly one Finished, with the clean exit code
    let tail = drain_until_closed(&mut events).await;
    let finishes: Vec<_> = tail
        .iter()
        .filter(|e| matches!(e, SessionEvent::Finished { .. }))
        .collect();
    assert_eq!(finishes.len(), 1, "events after connect: {tail:?}");
    assert!(matches!(
        finishes[0],
        SessionEvent::Finished { exit_code: 0 }
    ));
}

/// **VALUE**: Verifies a stop while connected emits Disconnected before
/// Finished.
///
/// **WHY THIS MATTERS**: Consumers clear daemon identity and node state on
/// Disconnected; skipping it on the stop path would leave a quit client
/// still rendering "connected" state.
#[tokio::test]
async fn given_connected_session_when_stopped_then_disconnected_precedes_finished() {
    // GIVEN: A connected session
    let (worker, mut events, _remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);
    wait_for_connected(&mut events).await;

    // WHEN: Stopping
    worker.stop();

    // THEN: Disconnected first, Finished last
    let tail = drain_until_closed(&mut events).await;
    assert_eq!(
        tail.last(),
        Some(&SessionEvent::Finished { exit_code: 0 }),
        "tail: {tail:?}"
    );
    assert!(
        tail.contains(&SessionEvent::Disconnected),
        "expected a Disconnected before Finished, got {tail:?}"
    );
}

/// **VALUE**: Verifies an unauthenticated session connects with an empty
/// node snapshot.
///
/// **WHY THIS MATTERS**: AuthLevel::None grants daemon identity queries
/// only; the Connected event must still fire (for status display) but with
/// no node access.
#[tokio::test]
async fn given_auth_none_when_connected_then_empty_node_snapshot() {
    // GIVEN: A daemon that has nodes to report
    let builder = SimCoreBuilder::new().nodes(vec![keyboard_node()]);
    let (worker, mut events, _remote) = start_worker(builder, AuthLevel::None);

    // WHEN: Connecting without authentication
    let connected = wait_for_connected(&mut events).await;

    // THEN: The snapshot is empty despite the daemon having nodes
    match connected {
        SessionEvent::Connected { nodes, .. } => assert!(nodes.is_empty()),
        other => panic!("expected Connected, got {other:?}"),
    }

    worker.stop();
}

/// **VALUE**: Verifies Connected and Disconnected strictly alternate across
/// repeated connection flaps.
///
/// **WHY THIS MATTERS**: This is the core ordering contract: consumers fold
/// these events into UI state and two consecutive Connected events without
/// an intervening Disconnected would mean a missed transition.
#[tokio::test]
async fn given_flapping_daemon_then_connected_and_disconnected_alternate() {
    // GIVEN: A session against a daemon we repeatedly kill
    let (worker, mut events, remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);

    // WHEN: Forcing three connect/drop cycles, then stopping
    let mut seen = Vec::new();
    for _ in 0..3 {
        loop {
            let event = next_event(&mut events).await;
            let connected = matches!(event, SessionEvent::Connected { .. });
            seen.push(event);
            if connected {
                break;
            }
        }
        remote.close_connection();
    }
    worker.stop();
    seen.extend(drain_until_closed(&mut events).await);

    // THEN: No two Connected events without a Disconnected between them
    let mut last_was_connected = false;
    for event in &seen {
        match event {
            SessionEvent::Connected { .. } => {
                assert!(
                    !last_was_connected,
                    "two Connected without Disconnected: {seen:?}"
                );
                last_was_connected = true;
            }
            SessionEvent::Disconnected => last_was_connected = false,
            _ => {}
        }
    }
}

/// **VALUE**: Verifies join() reports the session's exit code once the loop
/// ends.
///
/// **WHY THIS MATTERS**: The launcher uses join() as the authoritative
/// process exit code; it must agree with the Finished event and resolve
/// promptly after a stop instead of hanging on the background task.
#[tokio::test]
async fn given_stopped_session_when_joined_then_clean_exit_code() {
    // GIVEN: A connected session
    let (mut worker, mut events, _remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);
    wait_for_connected(&mut events).await;

    // WHEN: Stopping, then joining the background task
    worker.stop();
    let exit_code = timeout(RECV_TIMEOUT, worker.join())
        .await
        .unwrap_or_else(|_| panic!("join did not resolve after stop"));

    // THEN: The code matches the clean Finished event
    assert_eq!(exit_code, 0);
    let tail = drain_until_closed(&mut events).await;
    assert_eq!(tail.last(), Some(&SessionEvent::Finished { exit_code: 0 }));
}

/// **VALUE**: Verifies dropping the worker stops the background session.
///
/// **WHY THIS MATTERS**: The worker owns a detached tokio task; without the
/// drop-to-stop contract, closing a window that owned a worker would leak a
/// reconnect loop for the process lifetime.
#[tokio::test]
async fn given_worker_dropped_then_session_finishes() {
    // GIVEN: A running worker whose event stream we keep
    let (worker, mut events, _remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);
    wait_for_connected(&mut events).await;

    // WHEN: The worker is dropped without an explicit stop
    drop(worker);

    // THEN: The session winds down with a clean Finished
    let tail = drain_until_closed(&mut events).await;
    assert_eq!(tail.last(), Some(&SessionEvent::Finished { exit_code: 0 }));
}
