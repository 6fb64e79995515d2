//! Async client for OpenAI-compatible APIs.

use crate::openai_compat::{
    CompletionRequest, CompletionResponse, EmbeddingRequest, EmbeddingResponse, OpenAICompatError,
};
use learner_core::ModelsConfig;
use learner_error::HttpError;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Client for the `/completions` and `/embeddings` endpoints of an
/// OpenAI-compatible server.
#[derive(Debug, Clone)]
pub struct OpenAICompatClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAICompatClient {
    /// Creates a client for `base_url` (for example `http://localhost:11434/v1`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, OpenAICompatError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAICompatError::Http(format!("Failed to build client: {}", e)))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        debug!(url = %base_url, authenticated = api_key.is_some(), "Created OpenAI-compatible client");

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Creates a client from the `[models]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &ModelsConfig) -> Result<Self, HttpError> {
        Ok(Self::new(
            config.base_url().clone(),
            config.api_key(),
            config.request_timeout(),
        )?)
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests a text completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, OpenAICompatError> {
        self.post("completions", request).await
    }

    /// Embeds a batch of texts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response cannot be parsed,
    /// or it does not hold exactly one vector per input.
    #[instrument(skip(self, request), fields(model = %request.model(), inputs = request.input().len()))]
    pub async fn embed(
        &self,
        request: &EmbeddingRequest,
    ) -> Result<Vec<Vec<f32>>, OpenAICompatError> {
        let mut response: EmbeddingResponse = self.post("embeddings", request).await?;
        if response.data.len() != request.input().len() {
            return Err(OpenAICompatError::EmptyResponse(format!(
                "expected {} embeddings, got {}",
                request.input().len(),
                response.data.len()
            )));
        }
        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, OpenAICompatError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, "Sending request");

        let mut builder = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            error!(url = %url, error = ?e, "HTTP request failed");
            OpenAICompatError::Http(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(url = %url, status = %status, error = %error_text, "API error");
            return Err(OpenAICompatError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response.json().await.map_err(|e| {
            error!(url = %url, error = ?e, "Failed to parse response");
            OpenAICompatError::ResponseParsing(format!("Failed to parse JSON: {}", e))
        })
    }
}
