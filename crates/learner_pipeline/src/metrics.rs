//! Metrics for the answer pipeline.
//!
//! With the `metrics` feature the recorders publish OpenTelemetry counters
//! and histograms through the global meter provider. Without it they compile
//! to nothing.

#[cfg(feature = "metrics")]
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};

/// Pipeline-level metrics.
#[cfg(feature = "metrics")]
#[derive(Clone)]
pub struct AnswerMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Queries handled, labelled by route
    pub queries: Counter<u64>,
    /// Generation duration in seconds
    pub generation_duration: Histogram<f64>,
    /// Generations that failed or timed out
    pub generation_failures: Counter<u64>,
    /// Apologies sent in place of an answer
    pub fallbacks: Counter<u64>,
    /// Retrieval failures
    pub retrieval_failures: Counter<u64>,
    /// Final replies that never reached the user
    pub delivery_failures: Counter<u64>,
}

#[cfg(feature = "metrics")]
impl AnswerMetrics {
    /// Create pipeline metrics.
    pub fn new() -> Self {
        let meter = global::meter("learner_pipeline");

        let queries = meter
            .u64_counter("learner.queries")
            .with_description("Queries handled by route")
            .build();
        let generation_duration = meter
            .f64_histogram("learner.generation.duration")
            .with_unit("seconds")
            .with_description("Time from submission to generation result")
            .build();
        let generation_failures = meter
            .u64_counter("learner.generation.failures")
            .with_description("Generations that failed or timed out")
            .build();
        let fallbacks = meter
            .u64_counter("learner.replies.fallback")
            .with_description("Apologies sent in place of an answer")
            .build();
        let retrieval_failures = meter
            .u64_counter("learner.retrieval.failures")
            .with_description("Retriever errors")
            .build();
        let delivery_failures = meter
            .u64_counter("learner.replies.undelivered")
            .with_description("Final replies that could not be sent")
            .build();

        tracing::debug!("AnswerMetrics instruments created");
        Self {
            _meter: meter,
            queries,
            generation_duration,
            generation_failures,
            fallbacks,
            retrieval_failures,
            delivery_failures,
        }
    }

    /// Record a routing decision.
    pub fn record_route(&self, route: &str) {
        self.queries
            .add(1, &[KeyValue::new("route", route.to_string())]);
    }

    /// Record a finished generation.
    pub fn record_generation(&self, duration_secs: f64, success: bool) {
        self.generation_duration.record(duration_secs, &[]);
        if !success {
            self.generation_failures.add(1, &[]);
        }
    }

    /// Record an apology reply.
    pub fn record_fallback(&self) {
        self.fallbacks.add(1, &[]);
    }

    /// Record a retrieval failure.
    pub fn record_retrieval_failure(&self) {
        self.retrieval_failures.add(1, &[]);
    }

    /// Record a final reply that could not be delivered.
    pub fn record_delivery_failure(&self) {
        self.delivery_failures.add(1, &[]);
    }
}

/// Pipeline-level metrics (disabled build).
#[cfg(not(feature = "metrics"))]
#[derive(Clone, Default)]
pub struct AnswerMetrics;

#[cfg(not(feature = "metrics"))]
impl AnswerMetrics {
    /// Create pipeline metrics.
    pub fn new() -> Self {
        Self
    }

    /// Record a routing decision.
    pub fn record_route(&self, _route: &str) {}

    /// Record a finished generation.
    pub fn record_generation(&self, _duration_secs: f64, _success: bool) {}

    /// Record an apology reply.
    pub fn record_fallback(&self) {}

    /// Record a retrieval failure.
    pub fn record_retrieval_failure(&self) {}

    /// Record a final reply that could not be delivered.
    pub fn record_delivery_failure(&self) {}
}

#[cfg(feature = "metrics")]
impl Default for AnswerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnswerMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerMetrics")
            .field("enabled", &cfg!(feature = "metrics"))
            .finish()
    }
}
