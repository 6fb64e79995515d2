//! Generation request and result types.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Default stop sequences; generation ends at the first occurrence of either.
pub const DEFAULT_STOP: [&str; 2] = ["Question:", "Answer:"];

/// Sampling parameters attached to every generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GenerationParams {
    /// Ordered stop sequences, matched case-sensitively
    stop: Vec<String>,
    /// Upper bound on generated tokens
    max_tokens: u32,
    /// Sampling randomness in [0, 1]
    temperature: f32,
}

impl GenerationParams {
    /// Create generation parameters.
    pub fn new(stop: Vec<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            stop,
            max_tokens,
            temperature,
        }
    }

    /// Cut `text` at the earliest occurrence of any stop sequence.
    ///
    /// Matching is case-sensitive. Empty stop sequences are ignored.
    pub fn cut_at_stop<'a>(&self, text: &'a str) -> &'a str {
        let end = self
            .stop
            .iter()
            .filter(|stop| !stop.is_empty())
            .filter_map(|stop| text.find(stop.as_str()))
            .min()
            .unwrap_or(text.len());
        &text[..end]
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            stop: DEFAULT_STOP.iter().map(|s| s.to_string()).collect(),
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// A single generation job: answer `query` using `document` as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GenerationRequest {
    /// The user's question
    query: String,
    /// Context document retrieved for the question
    document: String,
    /// Sampling parameters
    params: GenerationParams,
}

impl GenerationRequest {
    /// Create a generation request.
    pub fn new(
        query: impl Into<String>,
        document: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            query: query.into(),
            document: document.into(),
            params,
        }
    }
}

/// Raw generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
pub struct GenerationResult {
    text: String,
}

impl GenerationResult {
    /// Wrap generated text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The generated text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the result, returning the text.
    pub fn into_text(self) -> String {
        self.text
    }
}
