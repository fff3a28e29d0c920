//! Long-running job tracking.
//!
//! A [`JobTracker`] turns a background task identifier into a stream of
//! [`PollState`] snapshots that terminates in an absorbing success or
//! failure. The triggering action is dispatched to an asynchronous execution
//! subsystem whose own job identifier is unknown until the outer task has
//! progressed past its first step, so the tracker adapts its polling target
//! mid-flight: once the second progress entry links a job, that job's detail
//! becomes the authoritative status source.
//!
//! Poll steps for one task are strictly sequential and never block the
//! caller; transient lookup failures reschedule at a longer backoff interval
//! and retry until cancelled.
//!
//! ```rust,no_run
//! use kanri::prelude::*;
//!
//! # struct MyApi;
//! # #[async_trait::async_trait]
//! # impl PipelineApi for MyApi {
//! #     async fn fetch_task_progress(&self, _: &str) -> std::result::Result<Vec<ProgressEntry>, LookupError> { Ok(vec![]) }
//! #     async fn fetch_job_detail(&self, _: &str) -> std::result::Result<JobDetail, LookupError> { unimplemented!() }
//! #     async fn fetch_connector_schema(&self, _: &str) -> std::result::Result<SchemaNode, LookupError> { unimplemented!() }
//! #     async fn submit_action(&self, _: Action) -> std::result::Result<SubmitReceipt, LookupError> { unimplemented!() }
//! # }
//! # async fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let api: Arc<dyn PipelineApi> = Arc::new(MyApi);
//! let tracker = JobTracker::builder(api).build();
//!
//! let mut session = tracker.track("task-42");
//! let terminal = session.await_terminal().await?;
//! for line in terminal.log_lines() {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod state;

pub use state::{PollState, PollStatus, ProgressEntry};

use crate::api::{JOB_FAILED, JOB_SUCCEEDED, PipelineApi};
use crate::error::TrackError;
use ahash::AHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Interval between polls while the task is still running.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Longer interval used after a transient lookup failure.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

struct SessionGuard {
    generation: u64,
    token: CancellationToken,
}

/// Tracks background tasks to their terminal state.
///
/// One tracker may track many tasks; starting a new session for a task id
/// that is already being tracked cancels the previous session, so a stale
/// worker can never overwrite fresher state.
pub struct JobTracker {
    api: Arc<dyn PipelineApi>,
    poll_interval: Duration,
    retry_interval: Duration,
    sessions: Arc<Mutex<AHashMap<String, SessionGuard>>>,
    next_generation: AtomicU64,
}

pub struct JobTrackerBuilder {
    api: Arc<dyn PipelineApi>,
    poll_interval: Duration,
    retry_interval: Duration,
}

impl JobTrackerBuilder {
    pub fn new(api: Arc<dyn PipelineApi>) -> Self {
        Self {
            api,
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    /// Interval between polls while the task is still running.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Backoff interval used after a transient lookup failure.
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn build(self) -> JobTracker {
        JobTracker {
            api: self.api,
            poll_interval: self.poll_interval,
            retry_interval: self.retry_interval,
            sessions: Arc::new(Mutex::new(AHashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }
}

impl JobTracker {
    pub fn builder(api: Arc<dyn PipelineApi>) -> JobTrackerBuilder {
        JobTrackerBuilder::new(api)
    }

    /// Starts tracking a task and returns the session handle observing it.
    ///
    /// Any previous session for the same task id on this tracker is
    /// cancelled before the new one starts.
    pub fn track(&self, task_id: &str) -> TrackSession {
        let token = CancellationToken::new();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        {
            let mut sessions = lock_sessions(&self.sessions);
            let guard = SessionGuard {
                generation,
                token: token.clone(),
            };
            if let Some(previous) = sessions.insert(task_id.to_string(), guard) {
                previous.token.cancel();
                debug!(task_id, "tracking_session_superseded");
            }
        }

        let (tx, rx) = watch::channel(PollState::pending(task_id));
        let worker = PollWorker {
            api: Arc::clone(&self.api),
            task_id: task_id.to_string(),
            poll_interval: self.poll_interval,
            retry_interval: self.retry_interval,
            tx,
            token: token.clone(),
            sessions: Arc::clone(&self.sessions),
            generation,
        };
        let handle = tokio::spawn(worker.run());

        TrackSession {
            task_id: task_id.to_string(),
            updates: rx,
            token,
            _handle: handle,
        }
    }
}

/// Handle to one tracking session.
///
/// Dropping the session cancels it: the worker's next pending wake-up is
/// invalidated and no further lookups are issued for it.
pub struct TrackSession {
    task_id: String,
    updates: watch::Receiver<PollState>,
    token: CancellationToken,
    _handle: JoinHandle<()>,
}

impl TrackSession {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// A receiver of every state snapshot the worker publishes.
    pub fn updates(&self) -> watch::Receiver<PollState> {
        self.updates.clone()
    }

    /// The most recent snapshot.
    pub fn latest(&self) -> PollState {
        self.updates.borrow().clone()
    }

    /// Cancels the session. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits until the task reaches its absorbing terminal state.
    ///
    /// Returns [`TrackError::Cancelled`] if the session is cancelled (or
    /// superseded by a newer session for the same task id) first.
    pub async fn await_terminal(&mut self) -> Result<PollState, TrackError> {
        loop {
            let snapshot = self.updates.borrow_and_update().clone();
            if snapshot.status.is_terminal() {
                return Ok(snapshot);
            }
            if self.updates.changed().await.is_err() {
                // Worker gone; either it published a terminal state last or
                // it was cancelled mid-flight.
                let last = self.updates.borrow().clone();
                return if last.status.is_terminal() {
                    Ok(last)
                } else {
                    Err(TrackError::Cancelled(self.task_id.clone()))
                };
            }
        }
    }
}

impl Drop for TrackSession {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

enum Step {
    /// Terminal state reached; stop polling.
    Terminal,
    /// Nothing decided yet; poll again after the normal interval.
    NotReady,
    /// Transient lookup failure; poll again after the backoff interval.
    Backoff,
}

struct PollWorker {
    api: Arc<dyn PipelineApi>,
    task_id: String,
    poll_interval: Duration,
    retry_interval: Duration,
    tx: watch::Sender<PollState>,
    token: CancellationToken,
    sessions: Arc<Mutex<AHashMap<String, SessionGuard>>>,
    generation: u64,
}

impl PollWorker {
    async fn run(self) {
        let mut state = PollState::pending(&self.task_id);
        state.status = PollStatus::Polling;
        self.tx.send_replace(state.clone());
        info!(task_id = %self.task_id, "tracking_started");

        loop {
            if self.token.is_cancelled() {
                debug!(task_id = %self.task_id, "tracking_cancelled");
                break;
            }

            let step = self.step(&mut state).await;
            self.tx.send_replace(state.clone());

            let delay = match step {
                Step::Terminal => {
                    info!(
                        task_id = %self.task_id,
                        status = ?state.status,
                        "tracking_terminal"
                    );
                    break;
                }
                Step::NotReady => self.poll_interval,
                Step::Backoff => self.retry_interval,
            };

            tokio::select! {
                _ = self.token.cancelled() => {
                    debug!(task_id = %self.task_id, "tracking_cancelled");
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.deregister();
    }

    /// One poll step. Never transitions state on a lookup failure.
    async fn step(&self, state: &mut PollState) -> Step {
        let progress = match self.api.fetch_task_progress(&self.task_id).await {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    task_id = %self.task_id,
                    error = %error,
                    "task_progress_lookup_failed"
                );
                return Step::Backoff;
            }
        };
        state.progress = progress;

        // The first entry is the fixed enqueue marker; the decision-relevant
        // entry is the second. A shorter log means the task has not started.
        let Some(entry) = state.progress.get(1) else {
            return Step::NotReady;
        };

        match entry {
            ProgressEntry::JobLinked { job_id, .. } => {
                let job_id = job_id.clone();
                let detail = match self.api.fetch_job_detail(&job_id).await {
                    Ok(detail) => detail,
                    Err(error) => {
                        warn!(
                            task_id = %self.task_id,
                            job_id = %job_id,
                            error = %error,
                            "job_detail_lookup_failed"
                        );
                        return Step::Backoff;
                    }
                };
                match detail.status.as_str() {
                    JOB_SUCCEEDED => {
                        let result = serde_json::to_value(&detail).unwrap_or(serde_json::Value::Null);
                        state.succeed(result);
                        Step::Terminal
                    }
                    JOB_FAILED => {
                        state.fail(format!("job {job_id} failed"), detail.logs);
                        Step::Terminal
                    }
                    _ => Step::NotReady,
                }
            }
            ProgressEntry::Terminal { status, .. } => {
                state.fail(status.clone(), Vec::new());
                Step::Terminal
            }
            ProgressEntry::Awaiting { .. } => Step::NotReady,
        }
    }

    /// Removes this worker's registration unless a newer session already
    /// replaced it.
    fn deregister(&self) {
        let mut sessions = lock_sessions(&self.sessions);
        let current = sessions
            .get(&self.task_id)
            .is_some_and(|guard| guard.generation == self.generation);
        if current {
            sessions.remove(&self.task_id);
        }
    }
}

fn lock_sessions(
    sessions: &Mutex<AHashMap<String, SessionGuard>>,
) -> std::sync::MutexGuard<'_, AHashMap<String, SessionGuard>> {
    sessions.lock().unwrap_or_else(PoisonError::into_inner)
}
