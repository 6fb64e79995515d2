//! Trait definitions for the collaborators the answer pipeline depends on.
//!
//! The pipeline never talks to a chat platform, vector index, or language
//! model directly. It consumes these capabilities, which lets the Discord
//! client, the embedding retriever, and the completion model be swapped for
//! in-memory doubles in tests.

#![warn(missing_docs)]

mod conversation;
mod generator;
mod retriever;

pub use conversation::{Conversation, TypingGuard};
pub use generator::Generator;
pub use retriever::Retriever;
