//! Worker execution context and consumer-facing contract.
//!
//! [`HidioWorker`] runs the session state machine on a dedicated tokio task
//! so the consumer's loop (a UI thread, typically) is never blocked, and
//! bridges every `SessionEvent` across contexts through an unbounded channel:
//! at-most-once delivery, emission order, and the bridge never blocks the
//! session loop regardless of consumer processing speed.
//!
//! This is the seam where the GUI layer attaches: a control surface
//! ([`start`], [`stop`], [`reset_core_log_position`]) plus a take-once event
//! subscription ([`events`]). The stream is restartable only by creating a
//! new worker.
//!
//! [`start`]: HidioWorker::start
//! [`stop`]: HidioWorker::stop
//! [`reset_core_log_position`]: HidioWorker::reset_core_log_position
//! [`events`]: HidioWorker::events

use crate::session::{EXIT_CLEAN, EXIT_FATAL, Session};
use crate::transport::{AuthLevel, CoreTransport};

use models::SessionEvent;

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use log::{debug, error, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Control messages into the running session loop.
///
/// All outside influence on the session goes through these; nothing mutates
/// session state from another context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Cooperative stop; observed at the loop's next suspension point.
    Stop,

    /// Re-subscribe the daemon log stream from the beginning.
    ResetCoreLogPosition,
}

/// Consumer end of the session event stream.
pub type EventStream = mpsc::UnboundedReceiver<SessionEvent>;

/// Handle to a session running on a background task.
///
/// Dropping the worker requests a stop, so the background task is never
/// leaked past the consumer's interest in it.
pub struct HidioWorker {
    control_tx: mpsc::UnboundedSender<ControlCommand>,
    events_rx: Option<EventStream>,
    pending: Option<Session>,
    task: Option<JoinHandle<i32>>,
}

impl HidioWorker {
    /// Build a worker around a transport. The session does not start
    /// until [`start`](HidioWorker::start) is called.
    pub fn new(
        transport: Box<dyn CoreTransport>,
        auth_level: AuthLevel,
        retry_interval: Duration,
    ) -> Self {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let session = Session::new(transport, auth_level, retry_interval, events_tx, control_rx);

        Self {
            control_tx,
            events_rx: Some(events_rx),
            pending: Some(session),
            task: None,
        }
    }

    /// Take the event subscription.
    ///
    /// Yields `Some` exactly once; the stream's lifetime is unbounded and it
    /// is restartable only by creating a new worker.
    pub fn events(&mut self) -> Option<EventStream> {
        self.events_rx.take()
    }

    /// Begin the session loop on a dedicated task. Returns immediately.
    ///
    /// A panic inside the loop is an uncaught defect: it is converted into a
    /// final `Finished` event with a failure code rather than silently
    /// swallowed.
    pub fn start(&mut self) {
        let Some(session) = self.pending.take() else {
            warn!("Worker already started");
            return;
        };

        let events = session.events_handle();
        self.task = Some(tokio::spawn(async move {
            match AssertUnwindSafe(session.run()).catch_unwind().await {
                Ok(exit_code) => exit_code,
                Err(_) => {
                    error!("Session loop panicked");
                    let _ = events.send(SessionEvent::Finished {
                        exit_code: EXIT_FATAL,
                    });
                    EXIT_FATAL
                }
            }
        }));
    }

    /// Request a cooperative stop. Returns immediately; completion is
    /// observed via the `Finished` event.
    pub fn stop(&self) {
        if self.control_tx.send(ControlCommand::Stop).is_err() {
            debug!("Stop requested after the session loop ended");
        }
    }

    /// Ask the daemon to replay its log stream from the beginning.
    pub fn reset_core_log_position(&self) {
        if self
            .control_tx
            .send(ControlCommand::ResetCoreLogPosition)
            .is_err()
        {
            debug!("Log position reset requested after the session loop ended");
        }
    }

    /// Wait for the session loop to finish and return its exit code.
    pub async fn join(&mut self) -> i32 {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(EXIT_FATAL),
            None => EXIT_CLEAN,
        }
    }
}

impl Drop for HidioWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
