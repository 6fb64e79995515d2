//! Bot configuration loaded from TOML.
//!
//! Every section is optional; missing fields fall back to the values the bot
//! was calibrated with.

use crate::GenerationParams;
use crate::request::DEFAULT_STOP;
use derive_getters::Getters;
use learner_error::{ConfigError, LearnerResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Top-level configuration for the answer bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Getters, TypedBuilder)]
#[serde(default)]
pub struct LearnerConfig {
    /// Confidence band thresholds
    #[builder(default)]
    router: RouterConfig,
    /// Generation parameters and worker settings
    #[builder(default)]
    generation: GenerationConfig,
    /// Reply formatting
    #[builder(default)]
    reply: ReplyConfig,
    /// Retrieval failure handling
    #[builder(default)]
    retrieval: RetrievalConfig,
    /// Model endpoints and knowledge base location
    #[builder(default)]
    models: ModelsConfig,
}

impl LearnerConfig {
    /// Load configuration from a TOML file.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> LearnerResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> LearnerResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.router.validate()?;
        self.generation.validate()?;
        self.reply.validate()?;
        Ok(())
    }
}

/// Distance thresholds separating the three confidence bands.
///
/// Distances are the retriever's dissimilarity scores (lower is more
/// relevant). Bands are closed-open: `[0, direct_below)` answers directly,
/// `[direct_below, clarify_at_or_above)` answers with a hedge, and anything at
/// or above `clarify_at_or_above` asks the user to rephrase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters, TypedBuilder)]
#[serde(default)]
pub struct RouterConfig {
    /// Upper (exclusive) bound of the direct-answer band
    #[builder(default = 0.7)]
    direct_below: f64,
    /// Lower (inclusive) bound of the clarification band
    #[builder(default = 1.1)]
    clarify_at_or_above: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            direct_below: 0.7,
            clarify_at_or_above: 1.1,
        }
    }
}

impl RouterConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.direct_below.is_finite() || !self.clarify_at_or_above.is_finite() {
            return Err(ConfigError::new("router thresholds must be finite"));
        }
        if self.direct_below < 0.0 {
            return Err(ConfigError::new("router.direct_below must be non-negative"));
        }
        if self.direct_below > self.clarify_at_or_above {
            return Err(ConfigError::new(format!(
                "router.direct_below ({}) must not exceed router.clarify_at_or_above ({})",
                self.direct_below, self.clarify_at_or_above
            )));
        }
        Ok(())
    }
}

/// Generation parameters and worker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, TypedBuilder)]
#[serde(default)]
pub struct GenerationConfig {
    /// Stop sequences passed to the generator
    #[builder(default = default_stop())]
    stop: Vec<String>,
    /// Upper bound on generated tokens
    #[builder(default = 1024)]
    max_tokens: u32,
    /// Sampling temperature in [0, 1]
    #[builder(default = 0.2)]
    temperature: f32,
    /// Give up waiting for a generation after this many seconds (unset waits forever)
    #[builder(default, setter(strip_option))]
    timeout_secs: Option<u64>,
    /// Submissions that may wait behind the running generation
    #[builder(default = 64)]
    queue_capacity: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            stop: default_stop(),
            max_tokens: 1024,
            temperature: 0.2,
            timeout_secs: None,
            queue_capacity: 64,
        }
    }
}

fn default_stop() -> Vec<String> {
    DEFAULT_STOP.iter().map(|s| s.to_string()).collect()
}

impl GenerationConfig {
    /// Parameters attached to each generation request.
    pub fn params(&self) -> GenerationParams {
        GenerationParams::new(self.stop.clone(), self.max_tokens, self.temperature)
    }

    /// Configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::new(format!(
                "generation.temperature must be within [0, 1], got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::new("generation.max_tokens must be positive"));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::new("generation.queue_capacity must be positive"));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::new(
                "generation.timeout_secs must be positive when set",
            ));
        }
        Ok(())
    }
}

/// Reply formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, TypedBuilder)]
#[serde(default)]
pub struct ReplyConfig {
    /// Platform message length limit in characters
    #[builder(default = 2000)]
    max_chars: usize,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self { max_chars: 2000 }
    }
}

impl ReplyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chars == 0 {
            return Err(ConfigError::new("reply.max_chars must be positive"));
        }
        Ok(())
    }
}

/// What to tell the user when the retriever fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalFailurePolicy {
    /// Send the fixed apology
    #[default]
    Apologize,
    /// Ask the user to rephrase
    Clarify,
}

/// Retrieval failure handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters, TypedBuilder)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Response when retrieval fails
    #[builder(default)]
    on_failure: RetrievalFailurePolicy,
}

/// Model endpoints and knowledge base location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, TypedBuilder)]
#[serde(default)]
pub struct ModelsConfig {
    /// Base URL of an OpenAI-compatible API (for example `http://localhost:11434/v1`)
    #[builder(default = default_base_url(), setter(into))]
    base_url: String,
    /// Model used for answer completion
    #[builder(default = default_completion_model(), setter(into))]
    completion_model: String,
    /// Model used for document and query embeddings
    #[builder(default = default_embedding_model(), setter(into))]
    embedding_model: String,
    /// Directory of `.md`/`.txt` reference documents
    #[builder(default = default_knowledge_dir(), setter(into))]
    knowledge_dir: PathBuf,
    /// Environment variable holding an optional API key
    #[builder(default = default_api_key_env(), setter(into))]
    api_key_env: String,
    /// Per-request HTTP timeout in seconds
    #[builder(default = 600)]
    request_timeout_secs: u64,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            completion_model: default_completion_model(),
            embedding_model: default_embedding_model(),
            knowledge_dir: default_knowledge_dir(),
            api_key_env: default_api_key_env(),
            request_timeout_secs: 600,
        }
    }
}

impl ModelsConfig {
    /// API key read from the configured environment variable, if set.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_completion_model() -> String {
    "llama3.2".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_knowledge_dir() -> PathBuf {
    PathBuf::from("knowledge")
}

fn default_api_key_env() -> String {
    "LEARNER_API_KEY".to_string()
}
