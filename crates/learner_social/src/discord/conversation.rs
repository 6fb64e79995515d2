//! Reply and typing handle for one Discord message.

use crate::discord::{DiscordError, DiscordErrorKind};
use async_trait::async_trait;
use learner_error::DeliveryError;
use learner_interface::{Conversation, TypingGuard};
use serenity::all::{Http, Message};
use std::sync::Arc;
use tracing::{debug, instrument};

/// The Discord message that triggered a query, plus the HTTP client used to
/// answer it.
///
/// Replies reference the triggering message and mention its author.
#[derive(Clone)]
pub struct DiscordConversation {
    http: Arc<Http>,
    message: Message,
}

impl DiscordConversation {
    /// Wrap `message` for replying through `http`.
    pub fn new(http: Arc<Http>, message: Message) -> Self {
        Self { http, message }
    }

    /// The originating message.
    pub fn message(&self) -> &Message {
        &self.message
    }
}

impl std::fmt::Debug for DiscordConversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConversation")
            .field("message_id", &self.message.id)
            .field("channel_id", &self.message.channel_id)
            .finish()
    }
}

#[async_trait]
impl Conversation for DiscordConversation {
    #[instrument(skip(self, text), fields(message_id = %self.message.id, chars = text.chars().count()))]
    async fn reply(&self, text: &str) -> Result<(), DeliveryError> {
        let sent = self
            .message
            .reply_ping(&self.http, text)
            .await
            .map_err(|e| DiscordError::new(DiscordErrorKind::MessageSendFailed(e.to_string())))?;
        debug!(reply_id = %sent.id, "Reply sent");
        Ok(())
    }

    fn start_typing(&self) -> TypingGuard {
        let typing = self.message.channel_id.start_typing(&self.http);
        TypingGuard::new(move || {
            typing.stop();
        })
    }
}
