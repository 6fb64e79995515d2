//! Turns generation outcomes into delivered replies.

use crate::messages::{FALLBACK_MESSAGE, preamble};
use learner_core::{GenerationResult, OutgoingReply, ReplyConfig};
use learner_error::{DeliveryError, GenerationError};
use learner_interface::Conversation;
use tracing::{debug, error, instrument};

/// What was delivered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Delivery {
    /// The composed answer reached the user.
    #[display("answered")]
    Answered,
    /// The fixed apology was sent in place of the answer.
    #[display("fallback")]
    Fallback,
}

/// Builds the final answer text and delivers it, falling back to an apology
/// on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerComposer {
    max_chars: usize,
}

impl AnswerComposer {
    /// Create a composer enforcing `config.max_chars()`.
    pub fn new(config: &ReplyConfig) -> Self {
        Self {
            max_chars: *config.max_chars(),
        }
    }

    /// Platform message limit in characters.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Prefix the generated text with the preamble for `source` and cap the
    /// whole message.
    ///
    /// Only the tail of the generated text is ever cut, unless the preamble on
    /// its own exceeds the limit.
    pub fn compose(&self, source: &str, result: &GenerationResult) -> OutgoingReply {
        let mut text = preamble(source);
        text.push_str(result.text());
        OutgoingReply::capped(text, self.max_chars)
    }

    /// A message capped to the platform limit.
    pub fn plain(&self, text: &str) -> OutgoingReply {
        OutgoingReply::capped(text, self.max_chars)
    }

    /// The fixed apology.
    pub fn fallback(&self) -> OutgoingReply {
        self.plain(FALLBACK_MESSAGE)
    }

    /// Deliver the answer for `outcome`, or the apology if generation failed
    /// or the answer could not be sent.
    ///
    /// # Errors
    ///
    /// Returns the delivery error only when the apology itself fails to send.
    #[instrument(skip(self, conversation, outcome))]
    pub async fn deliver(
        &self,
        conversation: &dyn Conversation,
        source: &str,
        outcome: Result<GenerationResult, GenerationError>,
    ) -> Result<Delivery, DeliveryError> {
        match outcome {
            Ok(result) => {
                let reply = self.compose(source, &result);
                debug!(chars = reply.char_len(), "Sending composed answer");
                match conversation.reply(reply.text()).await {
                    Ok(()) => Ok(Delivery::Answered),
                    Err(e) => {
                        error!(error = %e, "Failed to deliver answer, sending apology");
                        self.send_fallback(conversation).await
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Generation failed, sending apology");
                self.send_fallback(conversation).await
            }
        }
    }

    async fn send_fallback(
        &self,
        conversation: &dyn Conversation,
    ) -> Result<Delivery, DeliveryError> {
        conversation.reply(self.fallback().text()).await?;
        Ok(Delivery::Fallback)
    }
}

impl Default for AnswerComposer {
    fn default() -> Self {
        Self::new(&ReplyConfig::default())
    }
}
