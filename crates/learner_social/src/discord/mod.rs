//! Discord integration built on serenity.

mod client;
mod conversation;
mod error;
mod handler;

pub use client::{build_client, gateway_intents};
pub use conversation::DiscordConversation;
pub use error::{DiscordError, DiscordErrorKind, DiscordResult};
pub use handler::LearnerHandler;
