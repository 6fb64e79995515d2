//! Data transfer objects for OpenAI-compatible APIs.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Text completion request (`POST /completions`).
#[derive(Debug, Clone, Serialize, TypedBuilder, Getters)]
pub struct CompletionRequest {
    /// Model identifier
    #[builder(setter(into))]
    model: String,
    /// Full prompt text
    #[builder(setter(into))]
    prompt: String,
    /// Maximum tokens to generate
    max_tokens: u32,
    /// Sampling temperature
    temperature: f32,
    /// Sequences that end generation
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    stop: Vec<String>,
}

/// A choice in the completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    /// Generated text
    pub text: String,
    /// Reason for finishing
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Text completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    /// Response choices
    pub choices: Vec<CompletionChoice>,
}

/// Embedding request (`POST /embeddings`).
#[derive(Debug, Clone, Serialize, TypedBuilder, Getters)]
pub struct EmbeddingRequest {
    /// Model identifier
    #[builder(setter(into))]
    model: String,
    /// Texts to embed
    input: Vec<String>,
}

/// One embedding vector.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingData {
    /// The embedding
    pub embedding: Vec<f32>,
    /// Position of the corresponding input
    #[serde(default)]
    pub index: usize,
}

/// Embedding response.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    /// One entry per input
    pub data: Vec<EmbeddingData>,
}

/// Errors from OpenAI-compatible APIs.
#[derive(Debug, Clone, derive_more::Display)]
pub enum OpenAICompatError {
    /// HTTP/network error
    #[display("HTTP error: {}", _0)]
    Http(String),

    /// API returned an error
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Response had no usable content
    #[display("Empty response: {}", _0)]
    EmptyResponse(String),

    /// Failed to parse response
    #[display("Response parsing failed: {}", _0)]
    ResponseParsing(String),
}

impl std::error::Error for OpenAICompatError {}

impl From<OpenAICompatError> for learner_error::HttpError {
    #[track_caller]
    fn from(err: OpenAICompatError) -> Self {
        learner_error::HttpError::new(err.to_string())
    }
}
