//! Model integrations for the Learner answer bot.
//!
//! Both collaborators talk to an OpenAI-compatible HTTP API (Ollama,
//! llama.cpp server, vLLM and similar):
//!
//! - [`CompletionGenerator`] answers a question from a context document via
//!   `/completions`. It implements the blocking
//!   [`Generator`](learner_interface::Generator) contract.
//! - [`EmbeddingRetriever`] embeds a [`KnowledgeBase`] once at startup and
//!   returns the nearest document for each query via `/embeddings`.

#![warn(missing_docs)]

mod generator;
mod knowledge;
mod openai_compat;
mod retriever;

pub use generator::{CompletionGenerator, build_prompt};
pub use knowledge::{Document, KnowledgeBase};
pub use openai_compat::{
    CompletionChoice, CompletionRequest, CompletionResponse, EmbeddingData, EmbeddingRequest,
    EmbeddingResponse, OpenAICompatClient, OpenAICompatError,
};
pub use retriever::{EmbeddingRetriever, euclidean_distance, normalize};
