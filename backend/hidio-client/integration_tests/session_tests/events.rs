// Event bridge: ordering, snapshot replacement, log stream control.

use crate::session_tests::helpers::{
    RECV_TIMEOUT, next_event, start_worker, wait_for_connected,
};

use hidio_client::transport::AuthLevel;
use hidio_client::transport::sim::{SimAttempt, SimCoreBuilder};

use models::{NodeDescriptor, NodeType, SessionEvent};

use std::time::Duration;

use tokio::time::{sleep, timeout};

fn api_node(id: u64, name: &str) -> NodeDescriptor {
    NodeDescriptor {
        node_type: NodeType::ApiClient,
        name: String::from(name),
        serial: format!("api:{id}"),
        id,
    }
}

/// **VALUE**: Verifies daemon log lines arrive in push order with no
/// reordering or loss.
///
/// **WHY THIS MATTERS**: The core log viewer renders these lines verbatim;
/// reordered log output is worse than none. Arrival order is the only
/// ordering guarantee the daemon gives us, so the bridge must preserve it
/// exactly, regardless of scheduling jitter.
///
/// **BUG THIS CATCHES**: Would catch the event bridge coalescing, dropping,
/// or racing log entries against each other.
#[tokio::test]
async fn given_log_lines_pushed_in_order_then_received_in_order() {
    // GIVEN: A connected session
    let (worker, mut events, remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);
    wait_for_connected(&mut events).await;

    // WHEN: The daemon pushes three log lines
    for line in ["a", "b", "c"] {
        assert!(remote.push_log_line(line).await, "push should be accepted");
    }

    // THEN: They arrive as CoreLogEntry events in exactly that order
    for expected in ["a", "b", "c"] {
        match next_event(&mut events).await {
            SessionEvent::CoreLogEntry { line } => assert_eq!(line, expected),
            other => panic!("expected CoreLogEntry({expected:?}), got {other:?}"),
        }
    }

    worker.stop();
}

/// **VALUE**: Verifies a later node snapshot fully replaces an earlier one.
///
/// **WHY THIS MATTERS**: Snapshots are values, not deltas. A consumer that
/// applies NodesUpdated events in order must end up with exactly the last
/// snapshot - entries absent from it are gone, with no merging.
///
/// **BUG THIS CATCHES**: Would catch a consumer-facing API that accumulates
/// nodes across updates instead of replacing them.
#[tokio::test]
async fn given_two_node_updates_then_last_snapshot_wins() {
    // GIVEN: A connected session and a consumer folding events into a view
    let (worker, mut events, remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);
    let mut view: Vec<NodeDescriptor> = match wait_for_connected(&mut events).await {
        SessionEvent::Connected { nodes, .. } => nodes,
        _ => unreachable!(),
    };

    // WHEN: The daemon pushes [A, B] and then [A]
    let node_a = api_node(1, "A");
    let node_b = api_node(2, "B");
    remote
        .push_nodes(vec![node_a.clone(), node_b.clone()])
        .await;
    remote.push_nodes(vec![node_a.clone()]).await;

    // THEN: Applying both updates in order leaves exactly [A]
    for _ in 0..2 {
        match next_event(&mut events).await {
            SessionEvent::NodesUpdated { nodes } => view = nodes,
            other => panic!("expected NodesUpdated, got {other:?}"),
        }
    }
    assert_eq!(view, vec![node_a]);

    worker.stop();
}

/// **VALUE**: Verifies node updates don't change the connection state.
///
/// **WHY THIS MATTERS**: NodesUpdated is a steady-state notification; if it
/// bounced the session through Disconnected, every device hotplug would
/// flicker the whole UI.
#[tokio::test]
async fn given_node_update_then_no_disconnect_emitted() {
    // GIVEN: A connected session
    let (worker, mut events, remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);
    wait_for_connected(&mut events).await;

    // WHEN: A node update followed by a log line
    remote.push_nodes(vec![api_node(1, "A")]).await;
    remote.push_log_line("still here").await;

    // THEN: The update arrives and the session is still relaying pushes,
    // with no Disconnected in between
    assert!(matches!(
        next_event(&mut events).await,
        SessionEvent::NodesUpdated { .. }
    ));
    assert!(matches!(
        next_event(&mut events).await,
        SessionEvent::CoreLogEntry { .. }
    ));

    worker.stop();
}

/// **VALUE**: Verifies reset_core_log_position() reaches the daemon as a
/// log stream rewind.
///
/// **WHY THIS MATTERS**: The core log viewer's "show from start" action is
/// a control message into the running loop - not a direct call - so this
/// covers the whole control path: consumer -> worker channel -> session ->
/// authenticated capability.
///
/// **BUG THIS CATCHES**: Would catch the control command being consumed but
/// never forwarded while connected.
#[tokio::test]
async fn given_reset_log_position_when_connected_then_daemon_sees_rewind() {
    // GIVEN: A connected, authenticated session
    let (worker, mut events, remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);
    wait_for_connected(&mut events).await;

    // WHEN: The consumer requests a log position reset
    worker.reset_core_log_position();

    // THEN: The daemon observes exactly one rewind request
    timeout(RECV_TIMEOUT, async {
        while remote.log_stream_resets() == 0 {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("daemon never saw the log stream rewind");
    assert_eq!(remote.log_stream_resets(), 1);

    worker.stop();
}

/// **VALUE**: Verifies a log position reset while disconnected is ignored.
///
/// **WHY THIS MATTERS**: The log stream is subscribe-to-receive, so there is
/// nothing to rewind without a connection; the command must be dropped
/// without reaching the daemon and without disturbing the retry loop.
#[tokio::test]
async fn given_reset_log_position_when_disconnected_then_ignored() {
    // GIVEN: A session that never connects
    let builder = SimCoreBuilder::new().repeat(SimAttempt::Refuse);
    let (worker, mut events, remote) = start_worker(builder, AuthLevel::Basic);

    // WHEN: The consumer requests a log position reset mid-retry
    worker.reset_core_log_position();

    // THEN: The retry loop keeps running and no rewind reaches the daemon
    for _ in 0..5 {
        match next_event(&mut events).await {
            SessionEvent::Disconnected | SessionEvent::Initiated { .. } => {}
            other => panic!("expected the retry loop to continue, got {other:?}"),
        }
    }
    assert_eq!(remote.log_stream_resets(), 0);

    worker.stop();
}

/// **VALUE**: Verifies pushes queued before a daemon-side close are still
/// delivered ahead of the Disconnected event.
///
/// **WHY THIS MATTERS**: Emission order is the contract; a close racing
/// in-flight log lines must not eat them or reorder them after the
/// disconnect notification.
#[tokio::test]
async fn given_pushes_before_close_then_delivered_before_disconnected() {
    // GIVEN: A connected session
    let (worker, mut events, remote) = start_worker(SimCoreBuilder::new(), AuthLevel::Basic);
    wait_for_connected(&mut events).await;

    // WHEN: A log line is pushed and the connection immediately dropped
    remote.push_log_line("last words").await;
    remote.close_connection();

    // THEN: The line arrives first, then Disconnected
    match next_event(&mut events).await {
        SessionEvent::CoreLogEntry { line } => assert_eq!(line, "last words"),
        other => panic!("expected CoreLogEntry, got {other:?}"),
    }
    assert!(matches!(
        next_event(&mut events).await,
        SessionEvent::Disconnected
    ));

    worker.stop();
}
