//! Discord client construction.

use crate::discord::{DiscordError, DiscordErrorKind, DiscordResult, LearnerHandler};
use serenity::all::{Client, GatewayIntents};
use tracing::{info, instrument};

/// Gateway intents the bot needs: guild and direct messages, with content.
pub fn gateway_intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Build a serenity client that dispatches events to `handler`.
///
/// # Errors
///
/// Returns [`DiscordErrorKind::InvalidToken`] for a blank token and
/// [`DiscordErrorKind::ConnectionFailed`] if serenity rejects the setup.
#[instrument(skip_all)]
pub async fn build_client(token: &str, handler: LearnerHandler) -> DiscordResult<Client> {
    let token = token.trim();
    if token.is_empty() {
        return Err(DiscordError::new(DiscordErrorKind::InvalidToken));
    }

    let client = Client::builder(token, gateway_intents())
        .event_handler(handler)
        .await
        .map_err(|e| DiscordError::new(DiscordErrorKind::ConnectionFailed(e.to_string())))?;

    info!("Discord client built");
    Ok(client)
}
