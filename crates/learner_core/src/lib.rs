//! Core data types for the Learner answer bot.
//!
//! This crate provides the values that flow through one query's handling
//! (query text, retrieval result, generation request and result, outgoing
//! reply) and the TOML configuration shared by every other crate.

mod config;
mod query;
mod reply;
mod request;
mod retrieval;

pub use config::{
    GenerationConfig, LearnerConfig, ModelsConfig, ReplyConfig, RetrievalConfig,
    RetrievalFailurePolicy, RouterConfig,
};
pub use query::Query;
pub use reply::{OutgoingReply, truncate_chars};
pub use request::{GenerationParams, GenerationRequest, GenerationResult};
pub use retrieval::RetrievalResult;
