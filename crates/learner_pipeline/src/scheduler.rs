//! Single-slot generation worker.
//!
//! Generation is synchronous and slow, so it never runs on the task that
//! handles chat events. Submissions are queued on a bounded FIFO channel and
//! a single worker task hands them, one at a time, to the blocking thread
//! pool. The submitting task only waits on a oneshot reply, leaving the event
//! loop free to handle other messages.

use learner_core::{GenerationConfig, GenerationParams, GenerationRequest, GenerationResult};
use learner_error::{GenerationError, GenerationErrorKind};
use learner_interface::Generator;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, instrument, warn};

type GenerationOutcome = Result<GenerationResult, GenerationError>;

/// Worker settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Submissions that may wait behind the running generation
    pub queue_capacity: usize,
    /// Fail a submission whose generation runs longer than this
    pub timeout: Option<Duration>,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            timeout: None,
        }
    }
}

impl From<&GenerationConfig> for SchedulerOptions {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            queue_capacity: *config.queue_capacity(),
            timeout: config.timeout(),
        }
    }
}

struct Job {
    request: GenerationRequest,
    reply: oneshot::Sender<GenerationOutcome>,
    enqueued_at: Instant,
}

/// Runs at most one generation at a time, in submission order.
pub struct GenerationScheduler {
    params: GenerationParams,
    tx: Mutex<Option<mpsc::Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    busy: Arc<AtomicBool>,
}

impl GenerationScheduler {
    /// Start the worker task for `generator`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        generator: Arc<dyn Generator>,
        params: GenerationParams,
        options: SchedulerOptions,
    ) -> Self {
        let (tx, rx) = mpsc::channel(options.queue_capacity.max(1));
        let busy = Arc::new(AtomicBool::new(false));
        let worker = tokio::spawn(run_worker(generator, rx, options.timeout, busy.clone()));

        info!(
            queue_capacity = options.queue_capacity,
            timeout_secs = options.timeout.map(|t| t.as_secs()),
            "Generation worker spawned"
        );

        Self {
            params,
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
            busy,
        }
    }

    /// Parameters attached to every submission.
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Queue a generation for `query` with `document` as context and wait
    /// for its result.
    ///
    /// Submissions are served strictly in the order they enter the queue.
    ///
    /// # Errors
    ///
    /// Returns the generator's error, [`GenerationErrorKind::Panicked`] if it
    /// panicked, [`GenerationErrorKind::TimedOut`] if it exceeded the
    /// configured timeout, or [`GenerationErrorKind::WorkerUnavailable`] after
    /// [`shutdown`](Self::shutdown).
    #[instrument(skip_all)]
    pub async fn submit(&self, query: &str, document: &str) -> GenerationOutcome {
        let request = GenerationRequest::new(query, document, self.params.clone());
        let tx = self
            .tx
            .lock()
            .clone()
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::WorkerUnavailable))?;

        let (reply, rx) = oneshot::channel();
        let job = Job {
            request,
            reply,
            enqueued_at: Instant::now(),
        };

        tx.send(job)
            .await
            .map_err(|_| GenerationError::new(GenerationErrorKind::WorkerUnavailable))?;
        debug!("Generation queued");

        rx.await
            .map_err(|_| GenerationError::new(GenerationErrorKind::WorkerUnavailable))?
    }

    /// Whether a generation currently occupies the worker slot.
    pub fn in_flight(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Stop accepting submissions, let queued jobs drain, and wait for the
    /// worker to exit.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        drop(self.tx.lock().take());
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                error!(error = ?e, "Generation worker terminated abnormally");
            }
        }
        info!("Generation worker stopped");
    }
}

impl std::fmt::Debug for GenerationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationScheduler")
            .field("params", &self.params)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

async fn run_worker(
    generator: Arc<dyn Generator>,
    mut rx: mpsc::Receiver<Job>,
    timeout: Option<Duration>,
    busy: Arc<AtomicBool>,
) {
    debug!("Generation worker started");

    while let Some(job) = rx.recv().await {
        let Job {
            request,
            reply,
            enqueued_at,
        } = job;

        if reply.is_closed() {
            debug!("Submitter went away while queued, skipping generation");
            continue;
        }

        debug!(
            waited_ms = enqueued_at.elapsed().as_millis() as u64,
            "Starting generation"
        );
        busy.store(true, Ordering::SeqCst);
        let started = Instant::now();

        let generator = generator.clone();
        let mut handle = tokio::task::spawn_blocking(move || generator.generate(&request));

        let outcome = match timeout {
            None => flatten(handle.await),
            Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
                Ok(joined) => flatten(joined),
                Err(_) => {
                    warn!(
                        timeout_secs = limit.as_secs(),
                        "Generation timed out, holding the slot until it returns"
                    );
                    let _ = reply.send(Err(GenerationError::new(GenerationErrorKind::TimedOut(
                        limit,
                    ))));
                    // The blocking thread cannot be cancelled; wait it out so
                    // the next job never overlaps with it.
                    match flatten(handle.await) {
                        Ok(_) => debug!("Timed-out generation finished, result discarded"),
                        Err(e) => debug!(error = %e, "Timed-out generation finished with error"),
                    }
                    busy.store(false, Ordering::SeqCst);
                    continue;
                }
            },
        };

        busy.store(false, Ordering::SeqCst);
        let duration = started.elapsed();
        match &outcome {
            Ok(result) => debug!(
                duration_ms = duration.as_millis() as u64,
                chars = result.text().chars().count(),
                "Generation completed"
            ),
            Err(e) => warn!(
                duration_ms = duration.as_millis() as u64,
                error = %e,
                "Generation failed"
            ),
        }

        if reply.send(outcome).is_err() {
            debug!("Submitter went away before the result arrived");
        }
    }

    debug!("Generation queue closed, worker exiting");
}

fn flatten(joined: Result<GenerationOutcome, JoinError>) -> GenerationOutcome {
    match joined {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => Err(GenerationError::new(GenerationErrorKind::Panicked(
            panic_message(e),
        ))),
        Err(e) => Err(GenerationError::new(GenerationErrorKind::Failed(e.to_string()))),
    }
}

fn panic_message(error: JoinError) -> String {
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
