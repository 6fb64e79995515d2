//! Chat platform integration for the Learner answer bot.
//!
//! The pipeline only sees a [`Query`](learner_core::Query) and a
//! `Conversation` handle. This crate turns
//! platform events into those:
//!
//! - [`route_message`] decides whether a message is addressed to the bot and
//!   extracts the query. It is platform-neutral apart from the mention syntax.
//! - `discord` (requires the `discord` feature) provides the serenity event
//!   handler, the reply/typing handle, and client construction.

#![warn(missing_docs)]

mod mention;

#[cfg(feature = "discord")]
mod discord;

pub use mention::route_message;

#[cfg(feature = "discord")]
pub use discord::{
    DiscordConversation, DiscordError, DiscordErrorKind, DiscordResult, LearnerHandler,
    build_client, gateway_intents,
};
