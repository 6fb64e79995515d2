//! Serenity event handler that feeds addressed messages to the pipeline.

use crate::discord::DiscordConversation;
use crate::route_message;
use async_trait::async_trait;
use learner_pipeline::AnswerPipeline;
use serenity::all::{Context, EventHandler, Message, Ready};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span};

/// Event handler for the Learner bot.
///
/// Serenity runs every event on its own task, so a slow answer never holds up
/// other messages. Generation itself is serialised by the pipeline's
/// scheduler.
#[derive(Clone)]
pub struct LearnerHandler {
    pipeline: Arc<AnswerPipeline>,
}

impl LearnerHandler {
    /// Create a handler answering through `pipeline`.
    pub fn new(pipeline: Arc<AnswerPipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl EventHandler for LearnerHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            user_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "Logged in to Discord"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let bot_id = ctx.cache.current_user().id.get();
        let Some(query) = route_message(msg.author.id.get(), bot_id, &msg.content) else {
            return;
        };

        let span = info_span!(
            "discord_message",
            message_id = %msg.id,
            channel_id = %msg.channel_id,
            author = %msg.author.name
        );
        let conversation = DiscordConversation::new(ctx.http.clone(), msg);

        async {
            debug!(query = %query, "Handling addressed message");
            match self.pipeline.handle(&query, &conversation).await {
                Ok(outcome) => info!(
                    state = %outcome.final_state(),
                    replies = outcome.replies_sent(),
                    fallback = outcome.fallback_sent(),
                    "Message handled"
                ),
                Err(e) => error!(error = %e, "Failed to answer message"),
            }
        }
        .instrument(span)
        .await;
    }
}
