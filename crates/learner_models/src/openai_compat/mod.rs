//! Client for OpenAI-compatible completion and embedding endpoints.

mod client;
mod dto;

pub use client::OpenAICompatClient;
pub use dto::{
    CompletionChoice, CompletionRequest, CompletionResponse, EmbeddingData, EmbeddingRequest,
    EmbeddingResponse, OpenAICompatError,
};
