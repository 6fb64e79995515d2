//! Test doubles for the pipeline's collaborators.
//!
//! A shared [`EventLog`] lets tests assert on the interleaving of replies and
//! generation work across the doubles.

#![allow(dead_code)]

use async_trait::async_trait;
use learner_core::{GenerationRequest, GenerationResult, Query, RetrievalResult};
use learner_error::{
    DeliveryError, GenerationError, GenerationErrorKind, RetrievalError, RetrievalErrorKind,
};
use learner_interface::{Conversation, Generator, Retriever, TypingGuard};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Ordered record of observable events.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().expect("Event log lock").push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().expect("Event log lock").clone()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.events().iter().position(|e| e.starts_with(prefix))
    }
}

/// Retriever returning a fixed result, or failing.
pub struct ScriptedRetriever {
    result: Result<RetrievalResult, RetrievalErrorKind>,
    calls: AtomicUsize,
}

impl ScriptedRetriever {
    pub fn returning(document: &str, source: &str, distance: f64) -> Self {
        Self {
            result: Ok(RetrievalResult::new(document, source, distance)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(kind: RetrievalErrorKind) -> Self {
        Self {
            result: Err(kind),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Retriever for ScriptedRetriever {
    async fn retrieve(&self, _query: &Query) -> Result<RetrievalResult, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(RetrievalError::new)
    }
}

/// How the recording generator responds.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Return this text
    Answer(String),
    /// Echo the query back, after an optional delay
    Echo(Duration),
    /// Return an error
    Fail,
    /// Panic inside the worker
    Panic,
    /// Sleep, then return this text
    Slow(Duration, String),
}

/// Generator that records every request and tracks concurrent executions.
pub struct RecordingGenerator {
    behaviors: Mutex<Vec<Behavior>>,
    default: Behavior,
    requests: Mutex<Vec<GenerationRequest>>,
    running: AtomicUsize,
    max_running: AtomicUsize,
    log: EventLog,
}

impl RecordingGenerator {
    pub fn new(default: Behavior) -> Self {
        Self::with_log(default, EventLog::default())
    }

    pub fn with_log(default: Behavior, log: EventLog) -> Self {
        Self {
            behaviors: Mutex::new(Vec::new()),
            default,
            requests: Mutex::new(Vec::new()),
            running: AtomicUsize::new(0),
            max_running: AtomicUsize::new(0),
            log,
        }
    }

    /// Behaviors consumed one per call before falling back to the default.
    pub fn then(self, script: Vec<Behavior>) -> Self {
        *self.behaviors.lock().expect("Behavior lock") = script;
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("Request lock").clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().expect("Request lock").len()
    }

    pub fn max_running(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }

    fn next_behavior(&self) -> Behavior {
        let mut behaviors = self.behaviors.lock().expect("Behavior lock");
        if behaviors.is_empty() {
            self.default.clone()
        } else {
            behaviors.remove(0)
        }
    }
}

impl Generator for RecordingGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError> {
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(running, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("Request lock")
            .push(request.clone());
        self.log.push(format!("generate:start:{}", request.query()));

        let outcome = match self.next_behavior() {
            Behavior::Answer(text) => Ok(GenerationResult::new(text)),
            Behavior::Echo(delay) => {
                std::thread::sleep(delay);
                Ok(GenerationResult::new(request.query().clone()))
            }
            Behavior::Fail => Err(GenerationError::new(GenerationErrorKind::Failed(
                "model crashed".to_string(),
            ))),
            Behavior::Panic => {
                self.running.fetch_sub(1, Ordering::SeqCst);
                panic!("model exploded");
            }
            Behavior::Slow(delay, text) => {
                std::thread::sleep(delay);
                Ok(GenerationResult::new(text))
            }
        };

        self.log.push(format!("generate:end:{}", request.query()));
        self.running.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// Conversation that records delivered replies and typing indicator use.
#[derive(Clone, Default)]
pub struct RecordingConversation {
    replies: Arc<Mutex<Vec<String>>>,
    attempts: Arc<AtomicUsize>,
    fail_attempts: Arc<HashSet<usize>>,
    typing_started: Arc<AtomicUsize>,
    typing_stopped: Arc<AtomicUsize>,
    log: EventLog,
}

impl RecordingConversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: EventLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Fail the reply attempts with these zero-based indices.
    pub fn failing_attempts(mut self, attempts: &[usize]) -> Self {
        self.fail_attempts = Arc::new(attempts.iter().copied().collect());
        self
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().expect("Reply lock").clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn typing_started(&self) -> usize {
        self.typing_started.load(Ordering::SeqCst)
    }

    pub fn typing_stopped(&self) -> usize {
        self.typing_stopped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Conversation for RecordingConversation {
    async fn reply(&self, text: &str) -> Result<(), DeliveryError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_attempts.contains(&attempt) {
            self.log.push("reply:failed");
            return Err(DeliveryError::new("platform rejected the message"));
        }
        self.log.push(format!("reply:{text}"));
        self.replies
            .lock()
            .expect("Reply lock")
            .push(text.to_string());
        Ok(())
    }

    fn start_typing(&self) -> TypingGuard {
        self.typing_started.fetch_add(1, Ordering::SeqCst);
        let stopped = self.typing_stopped.clone();
        TypingGuard::new(move || {
            stopped.fetch_add(1, Ordering::SeqCst);
        })
    }
}
