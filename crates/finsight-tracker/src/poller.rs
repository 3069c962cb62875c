/*
[INPUT]:  A bound task id, an AnalysisApi, and a cancellation token
[OUTPUT]: Status snapshots delivered in fetch order to a StatusSink
[POS]:    Core layer - fixed-cadence polling of one task at a time
[UPDATE]: When the cadence or stop/terminal semantics change
*/

use std::sync::{Arc, Mutex};
use std::time::Duration;

use finsight_client::{FinsightError, TaskId};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::AnalysisApi;
use crate::snapshot::StatusSnapshot;

/// Reference polling cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Where accepted snapshots and fatal errors go.
///
/// `publish` returns `false` when the snapshot was rejected as stale; the
/// poll loop stops itself on rejection, since its binding has been
/// superseded. Both calls carry the session generation captured when the
/// fetch was issued, so the sink can compare it against the current one.
pub trait StatusSink: Send + Sync + 'static {
    fn publish(&self, generation: u64, snapshot: StatusSnapshot) -> bool;
    fn fatal(&self, generation: u64, error: FinsightError);
}

#[derive(Debug)]
struct ActivePoll {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Polls the status of exactly one bound task at a fixed cadence.
///
/// `start` issues one fetch immediately, then one per interval tick. The
/// loop ends on cancellation, on a terminal snapshot, on a rejected
/// (stale) publish, or after forwarding a fatal auth error. Transient and
/// malformed-status fetch failures are logged and simply awaited out until
/// the next tick.
pub struct PollScheduler<A> {
    api: Arc<A>,
    interval: Duration,
    active: Mutex<Option<ActivePoll>>,
}

impl<A: AnalysisApi> PollScheduler<A> {
    pub fn new(api: Arc<A>, interval: Duration) -> Self {
        Self {
            api,
            interval,
            active: Mutex::new(None),
        }
    }

    /// Bind to `task_id` and begin polling. An existing binding is stopped
    /// first, whether it was for the same task or a different one.
    pub fn start(&self, task_id: TaskId, generation: u64, sink: Arc<dyn StatusSink>) {
        self.stop();

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.api.clone(),
            task_id,
            generation,
            self.interval,
            cancel.clone(),
            sink,
        ));

        let mut active = self.active.lock().unwrap();
        *active = Some(ActivePoll { cancel, handle });
    }

    /// Cancel the current binding; idempotent, safe when not started.
    pub fn stop(&self) {
        let mut active = self.active.lock().unwrap();
        if let Some(poll) = active.take() {
            poll.cancel.cancel();
        }
    }

    /// Whether a poll loop is currently bound and running.
    pub fn is_polling(&self) -> bool {
        let active = self.active.lock().unwrap();
        active
            .as_ref()
            .is_some_and(|poll| !poll.handle.is_finished())
    }
}

impl<A> Drop for PollScheduler<A> {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap();
        if let Some(poll) = active.take() {
            poll.cancel.cancel();
        }
    }
}

async fn poll_loop<A: AnalysisApi>(
    api: Arc<A>,
    task_id: TaskId,
    generation: u64,
    interval: Duration,
    cancel: CancellationToken,
    sink: Arc<dyn StatusSink>,
) {
    let mut ticker = tokio::time::interval(interval);
    // A tick that fires while a fetch is still outstanding is skipped, not
    // queued: fetches within one session are strictly sequential.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            _ = cancel.cancelled() => break,
            result = api.fetch_status(&task_id) => result,
        };
        if cancel.is_cancelled() {
            break;
        }

        match fetched {
            Ok(snapshot) => {
                let terminal = snapshot.is_terminal();
                if !sink.publish(generation, snapshot) {
                    // Superseded binding; this loop is no longer current.
                    break;
                }
                if terminal {
                    tracing::debug!(task_id = %task_id, "terminal status reached; polling ends");
                    break;
                }
            }
            Err(err) if err.is_auth_error() => {
                sink.fatal(generation, err);
                break;
            }
            Err(err) => {
                tracing::warn!(
                    task_id = %task_id,
                    "status fetch failed; retrying on next tick: {err}"
                );
            }
        }
    }
}
