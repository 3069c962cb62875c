/*
[INPUT]:  Analysis requests, task ids to observe, and an AnalysisApi
[OUTPUT]: A single atomically replaced WatchState slot plus fatal-auth callbacks
[POS]:    Core layer - analysis task lifecycle coordination
[UPDATE]: When observation or submission semantics change
*/

use std::sync::{Arc, Mutex};
use std::time::Duration;

use finsight_client::{FinsightError, TaskId};
use thiserror::Error;
use tokio::sync::watch;

use crate::api::{AnalysisApi, AnalysisRequest};
use crate::poller::{DEFAULT_POLL_INTERVAL, PollScheduler, StatusSink};
use crate::snapshot::{StatusSnapshot, WatchState};

/// Process-wide reaction to a rejected credential, owned by the host
/// (typically: clear stored credentials and return to an unauthenticated
/// state). Plain callback; no ambient global state.
pub type AuthFailureHook = Arc<dyn Fn(&FinsightError) + Send + Sync>;

/// Submission failures, surfaced synchronously to the submit caller.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("analysis instructions must not be empty")]
    EmptyInstructions,
    #[error("document submission failed: {0}")]
    Rejected(#[from] FinsightError),
}

/// Coordinator tuning knobs.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// State shared between the coordinator and its poll loops.
///
/// The generation counter and the published slot are guarded together: a
/// poll loop's publish compares its captured generation against the current
/// one under the same lock that `observe` advances it with, so a superseded
/// fetch can never slip its snapshot in after the switch.
struct Shared {
    generation: Mutex<u64>,
    published: watch::Sender<WatchState>,
    on_auth_failure: Mutex<Option<AuthFailureHook>>,
}

impl Shared {
    fn advance_generation(&self, next_state: Option<WatchState>) -> u64 {
        let mut generation = self.generation.lock().unwrap();
        *generation += 1;
        if let Some(state) = next_state {
            self.published.send_replace(state);
        }
        *generation
    }
}

impl StatusSink for Shared {
    fn publish(&self, generation: u64, snapshot: StatusSnapshot) -> bool {
        let current = self.generation.lock().unwrap();
        if *current != generation {
            tracing::debug!(
                task_id = %snapshot.task_id,
                stale_generation = generation,
                current_generation = *current,
                "discarding stale status snapshot"
            );
            return false;
        }
        self.published.send_replace(WatchState::Watching(snapshot));
        true
    }

    fn fatal(&self, generation: u64, error: FinsightError) {
        // The hook is cloned out under the generation lock but invoked
        // outside it: hooks may call back into the coordinator.
        let hook = {
            let current = self.generation.lock().unwrap();
            if *current != generation {
                // A superseded session's auth failure must not log the user out.
                return;
            }
            tracing::error!("credential rejected while polling: {error}");
            self.on_auth_failure.lock().unwrap().clone()
        };
        if let Some(hook) = hook {
            hook(&error);
        }
    }
}

/// Owns the single observation session: which task is watched, the poll
/// loop watching it, and the one published state slot readers see.
pub struct Coordinator<A: AnalysisApi> {
    api: Arc<A>,
    scheduler: PollScheduler<A>,
    shared: Arc<Shared>,
}

impl<A: AnalysisApi> Coordinator<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self::with_config(api, TrackerConfig::default())
    }

    pub fn with_config(api: Arc<A>, config: TrackerConfig) -> Self {
        let (published, _) = watch::channel(WatchState::Idle);
        Self {
            scheduler: PollScheduler::new(api.clone(), config.poll_interval),
            api,
            shared: Arc::new(Shared {
                generation: Mutex::new(0),
                published,
                on_auth_failure: Mutex::new(None),
            }),
        }
    }

    /// Install the host's reaction to fatal auth errors. Replaces any
    /// previously installed hook.
    pub fn set_auth_failure_hook(&self, hook: AuthFailureHook) {
        let mut slot = self.shared.on_auth_failure.lock().unwrap();
        *slot = Some(hook);
    }

    /// Subscribe to published-state changes.
    pub fn subscribe(&self) -> watch::Receiver<WatchState> {
        self.shared.published.subscribe()
    }

    /// The currently published state.
    pub fn current_state(&self) -> WatchState {
        self.shared.published.borrow().clone()
    }

    /// The latest accepted snapshot, or `None` when nothing is observed.
    pub fn current_snapshot(&self) -> Option<StatusSnapshot> {
        self.shared.published.borrow().snapshot().cloned()
    }

    /// Whether an observation session is currently polling.
    pub fn is_observing(&self) -> bool {
        self.scheduler.is_polling()
    }

    /// Submit a document and, on success, immediately observe the returned
    /// task. On failure the submission-failed state is published, any live
    /// session is stopped, and no new session is created.
    pub async fn start_new_analysis(&self, request: AnalysisRequest) -> Result<TaskId, SubmitError> {
        if request.query.trim().is_empty() {
            return Err(SubmitError::EmptyInstructions);
        }

        match self.api.submit(request).await {
            Ok(task_id) => {
                tracing::info!(task_id = %task_id, "analysis submitted");
                self.observe(task_id.clone());
                Ok(task_id)
            }
            Err(err) => {
                tracing::warn!("analysis submission failed: {err}");
                self.shared.advance_generation(Some(WatchState::SubmissionFailed {
                    message: err.to_string(),
                }));
                self.scheduler.stop();
                Err(SubmitError::from(err))
            }
        }
    }

    /// Switch observation to `task_id`.
    ///
    /// The previous session (if any) is superseded before the new session's
    /// first fetch: its in-flight response, should one resolve later, is
    /// discarded by the generation check. Re-observing the already-active
    /// task rebinds it and restarts the cadence from zero. A pending
    /// placeholder is published so readers never see the previous task's
    /// snapshot under the new task id.
    pub fn observe(&self, task_id: TaskId) {
        let generation = self.shared.advance_generation(Some(WatchState::Watching(
            StatusSnapshot::placeholder(task_id.clone()),
        )));

        tracing::info!(task_id = %task_id, generation, "observing analysis task");
        self.scheduler
            .start(task_id, generation, self.shared.clone());
    }

    /// Stop observing entirely. Idempotent. The last published state stays
    /// readable; in-flight responses are discarded.
    pub fn shutdown(&self) {
        self.shared.advance_generation(None);
        self.scheduler.stop();
    }
}
