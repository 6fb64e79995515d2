//! Confidence-gated retrieval-augmented answer pipeline.
//!
//! For each addressed chat message the [`AnswerPipeline`] retrieves the
//! nearest reference document, lets the [`ConfidenceRouter`] pick a response
//! strategy from the retrieval distance, runs generation on the single-slot
//! [`GenerationScheduler`], and hands the outcome to the [`AnswerComposer`]
//! for delivery.

#![warn(missing_docs)]

mod composer;
mod messages;
mod metrics;
mod pipeline;
mod router;
mod scheduler;

pub use composer::{AnswerComposer, Delivery};
pub use messages::{CLARIFICATION_MESSAGE, FALLBACK_MESSAGE, hedge_message, preamble};
pub use metrics::AnswerMetrics;
pub use pipeline::{AnswerPipeline, HandlingOutcome, HandlingState};
pub use router::{ConfidenceRouter, Route};
pub use scheduler::{GenerationScheduler, SchedulerOptions};
