//! Completion-backed generator.

use crate::openai_compat::{CompletionRequest, OpenAICompatClient, OpenAICompatError};
use learner_core::{GenerationRequest, GenerationResult};
use learner_error::{GenerationError, GenerationErrorKind};
use learner_interface::Generator;
use tokio::runtime::Handle;
use tracing::{debug, instrument};

/// Build the completion prompt for a question and its context document.
///
/// The prompt ends with `Answer:` so that the model's next `Question:` or
/// `Answer:` marks the end of its answer.
pub fn build_prompt(query: &str, document: &str) -> String {
    format!(
        "Use the following context to answer the question.\n\n\
         Context:\n{document}\n\n\
         Question: {query}\n\
         Answer:"
    )
}

/// Generator backed by an OpenAI-compatible `/completions` endpoint.
///
/// [`Generator::generate`] blocks the calling thread until the completion
/// arrives, driving the request on the runtime it was created in. Call it
/// from a blocking thread (`spawn_blocking`), never from an async task.
#[derive(Debug, Clone)]
pub struct CompletionGenerator {
    client: OpenAICompatClient,
    model: String,
    runtime: Handle,
}

impl CompletionGenerator {
    /// Create a generator for `model`, bound to the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new(client: OpenAICompatClient, model: impl Into<String>) -> Self {
        Self::with_runtime(client, model, Handle::current())
    }

    /// Create a generator that drives requests on `runtime`.
    pub fn with_runtime(
        client: OpenAICompatClient,
        model: impl Into<String>,
        runtime: Handle,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            runtime,
        }
    }

    /// Model used for completions.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, OpenAICompatError> {
        let params = request.params();
        let completion = CompletionRequest::builder()
            .model(self.model.as_str())
            .prompt(build_prompt(request.query(), request.document()))
            .max_tokens(*params.max_tokens())
            .temperature(*params.temperature())
            .stop(params.stop().clone())
            .build();

        let response = self.client.complete(&completion).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAICompatError::EmptyResponse("no completion choices".into()))?;

        debug!(finish_reason = ?choice.finish_reason, "Completion received");
        Ok(choice.text)
    }
}

impl Generator for CompletionGenerator {
    #[instrument(skip(self, request), fields(model = %self.model))]
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError> {
        let text = self
            .runtime
            .block_on(self.complete(request))
            .map_err(|e| GenerationError::new(GenerationErrorKind::Failed(e.to_string())))?;

        // Servers do not all honour `stop`; enforce it here as well.
        let text = request.params().cut_at_stop(&text);
        Ok(GenerationResult::new(text))
    }
}
