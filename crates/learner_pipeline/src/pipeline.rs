//! Per-query answer orchestration.

use crate::composer::{AnswerComposer, Delivery};
use crate::messages::{CLARIFICATION_MESSAGE, hedge_message};
use crate::metrics::AnswerMetrics;
use crate::router::{ConfidenceRouter, Route};
use crate::scheduler::GenerationScheduler;
use derive_getters::Getters;
use learner_core::{LearnerConfig, Query, RetrievalFailurePolicy, RetrievalResult};
use learner_error::{DeliveryError, LearnerResult, RetrievalError};
use learner_interface::{Conversation, Retriever};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Lifecycle states of one addressed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HandlingState {
    /// Message accepted by the dispatcher
    #[display("RECEIVED")]
    Received,
    /// Waiting on the retriever
    #[display("RETRIEVING")]
    Retrieving,
    /// Confident match, answering silently
    #[display("DIRECT")]
    Direct,
    /// Weak match, interim acknowledgment sent
    #[display("HEDGED")]
    Hedged,
    /// No usable match, asking to rephrase
    #[display("CLARIFY")]
    Clarify,
    /// Waiting on the generation worker
    #[display("GENERATING")]
    Generating,
    /// Building and sending the answer
    #[display("COMPOSING")]
    Composing,
    /// Generation or delivery failed, apology pending
    #[display("FAILED")]
    Failed,
    /// A final reply reached the user
    #[display("REPLIED")]
    Replied,
}

impl From<Route> for HandlingState {
    fn from(route: Route) -> Self {
        match route {
            Route::Direct => HandlingState::Direct,
            Route::Hedged => HandlingState::Hedged,
            Route::Clarify => HandlingState::Clarify,
        }
    }
}

/// Summary of how one query was handled.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct HandlingOutcome {
    /// Route chosen from the retrieval distance, if retrieval succeeded
    route: Option<Route>,
    /// States visited, in order
    states: Vec<HandlingState>,
    /// Whether the apology was sent instead of an answer
    fallback_sent: bool,
    /// Number of messages delivered to the user
    replies_sent: usize,
}

impl HandlingOutcome {
    /// The terminal state.
    pub fn final_state(&self) -> HandlingState {
        self.states
            .last()
            .copied()
            .unwrap_or(HandlingState::Received)
    }
}

struct Progress {
    states: Vec<HandlingState>,
    route: Option<Route>,
    fallback_sent: bool,
    replies_sent: usize,
}

impl Progress {
    fn new() -> Self {
        let progress = Self {
            states: vec![HandlingState::Received],
            route: None,
            fallback_sent: false,
            replies_sent: 0,
        };
        debug!(state = %HandlingState::Received, "Query state");
        progress
    }

    fn enter(&mut self, next: HandlingState) {
        debug!(state = %next, "Query state");
        self.states.push(next);
    }

    fn fail(&mut self) {
        if self.states.last() != Some(&HandlingState::Failed) {
            self.enter(HandlingState::Failed);
        }
    }

    /// Account for the composer's delivery of the final reply.
    fn settle(
        &mut self,
        delivered: Result<Delivery, DeliveryError>,
        metrics: &AnswerMetrics,
    ) -> Result<(), DeliveryError> {
        match delivered {
            Ok(Delivery::Answered) => {
                self.replies_sent += 1;
            }
            Ok(Delivery::Fallback) => {
                self.fail();
                self.fallback_sent = true;
                self.replies_sent += 1;
                metrics.record_fallback();
            }
            Err(e) => {
                self.fail();
                error!(error = %e, "Apology could not be delivered");
                metrics.record_delivery_failure();
                return Err(e);
            }
        }
        Ok(())
    }

    fn finish(mut self) -> HandlingOutcome {
        self.enter(HandlingState::Replied);
        HandlingOutcome {
            route: self.route,
            states: self.states,
            fallback_sent: self.fallback_sent,
            replies_sent: self.replies_sent,
        }
    }
}

/// Confidence-gated retrieval-augmented answering for one chat bot.
///
/// The retriever and the generation worker are injected at construction and
/// shared by every query the bot handles.
pub struct AnswerPipeline {
    retriever: Arc<dyn Retriever>,
    scheduler: Arc<GenerationScheduler>,
    router: ConfidenceRouter,
    composer: AnswerComposer,
    on_retrieval_failure: RetrievalFailurePolicy,
    metrics: AnswerMetrics,
}

impl AnswerPipeline {
    /// Assemble a pipeline from its collaborators and configuration.
    pub fn new(
        retriever: Arc<dyn Retriever>,
        scheduler: Arc<GenerationScheduler>,
        config: &LearnerConfig,
    ) -> Self {
        Self {
            retriever,
            scheduler,
            router: ConfidenceRouter::new(config.router()),
            composer: AnswerComposer::new(config.reply()),
            on_retrieval_failure: *config.retrieval().on_failure(),
            metrics: AnswerMetrics::new(),
        }
    }

    /// The generation worker backing this pipeline.
    pub fn scheduler(&self) -> &Arc<GenerationScheduler> {
        &self.scheduler
    }

    /// Answer `query`, replying through `conversation`.
    ///
    /// The conversation shows a typing indicator for the whole call. Failures
    /// in retrieval, generation, or answer delivery are turned into a reply;
    /// an error is returned only if the final reply could not be sent.
    ///
    /// # Errors
    ///
    /// Returns a delivery error when the last message to the user fails.
    #[instrument(skip(self, conversation), fields(query = %query))]
    pub async fn handle(
        &self,
        query: &Query,
        conversation: &dyn Conversation,
    ) -> LearnerResult<HandlingOutcome> {
        let _typing = conversation.start_typing();
        let mut progress = Progress::new();

        if query.is_blank() {
            info!("Blank query, asking for clarification");
            progress.enter(HandlingState::Clarify);
            self.send(conversation, CLARIFICATION_MESSAGE, &mut progress)
                .await?;
            return Ok(progress.finish());
        }

        progress.enter(HandlingState::Retrieving);
        let retrieval = match self
            .retriever
            .retrieve(query)
            .await
            .and_then(RetrievalResult::validate)
        {
            Ok(retrieval) => retrieval,
            Err(e) => return self.recover_from_retrieval(e, conversation, progress).await,
        };

        let distance = *retrieval.distance();
        let source = retrieval.source().as_str();
        let route = self.router.route(distance);
        progress.route = Some(route);
        progress.enter(route.into());
        self.metrics.record_route(&route.to_string());
        info!(distance, source = %source, route = %route, "Routed query");

        match route {
            Route::Clarify => {
                self.send(conversation, CLARIFICATION_MESSAGE, &mut progress)
                    .await?;
                return Ok(progress.finish());
            }
            Route::Hedged => {
                // The acknowledgment is best-effort; the answer follows regardless.
                match conversation
                    .reply(self.composer.plain(&hedge_message(source)).text())
                    .await
                {
                    Ok(()) => progress.replies_sent += 1,
                    Err(e) => warn!(error = %e, "Failed to send interim acknowledgment"),
                }
            }
            Route::Direct => {}
        }

        progress.enter(HandlingState::Generating);
        let started = Instant::now();
        let outcome = self
            .scheduler
            .submit(query.as_str(), retrieval.document())
            .await;
        self.metrics
            .record_generation(started.elapsed().as_secs_f64(), outcome.is_ok());

        progress.enter(if outcome.is_ok() {
            HandlingState::Composing
        } else {
            HandlingState::Failed
        });

        let delivered = self.composer.deliver(conversation, source, outcome).await;
        progress.settle(delivered, &self.metrics)?;

        Ok(progress.finish())
    }

    async fn recover_from_retrieval(
        &self,
        error: RetrievalError,
        conversation: &dyn Conversation,
        mut progress: Progress,
    ) -> LearnerResult<HandlingOutcome> {
        self.metrics.record_retrieval_failure();
        match self.on_retrieval_failure {
            RetrievalFailurePolicy::Apologize => {
                error!(error = %error, "Retrieval failed, sending apology");
                progress.enter(HandlingState::Failed);
                if let Err(e) = self
                    .send(conversation, self.composer.fallback().text(), &mut progress)
                    .await
                {
                    self.metrics.record_delivery_failure();
                    return Err(e);
                }
                progress.fallback_sent = true;
                self.metrics.record_fallback();
            }
            RetrievalFailurePolicy::Clarify => {
                warn!(error = %error, "Retrieval failed, asking for clarification");
                progress.enter(HandlingState::Clarify);
                self.send(conversation, CLARIFICATION_MESSAGE, &mut progress)
                    .await?;
            }
        }
        Ok(progress.finish())
    }

    async fn send(
        &self,
        conversation: &dyn Conversation,
        text: &str,
        progress: &mut Progress,
    ) -> LearnerResult<()> {
        conversation.reply(self.composer.plain(text).text()).await?;
        progress.replies_sent += 1;
        Ok(())
    }
}

impl std::fmt::Debug for AnswerPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerPipeline")
            .field("router", &self.router)
            .field("composer", &self.composer)
            .field("on_retrieval_failure", &self.on_retrieval_failure)
            .finish_non_exhaustive()
    }
}
