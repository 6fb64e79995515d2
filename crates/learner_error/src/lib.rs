//! Error types for the Learner answer bot.
//!
//! Every error records the file and line where it was raised. Domain errors
//! (configuration, retrieval, generation, delivery, HTTP) convert into the
//! crate-wide [`LearnerError`] so callers can use `?` across crate boundaries.

#![warn(missing_docs)]

mod config;
mod delivery;
mod generation;
mod http;
mod retrieval;

pub use config::ConfigError;
pub use delivery::DeliveryError;
pub use generation::{GenerationError, GenerationErrorKind};
pub use http::HttpError;
pub use retrieval::{RetrievalError, RetrievalErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum LearnerErrorKind {
    /// Configuration error
    #[display("{_0}")]
    Config(ConfigError),
    /// Retrieval error
    #[display("{_0}")]
    Retrieval(RetrievalError),
    /// Generation error
    #[display("{_0}")]
    Generation(GenerationError),
    /// Reply delivery error
    #[display("{_0}")]
    Delivery(DeliveryError),
    /// HTTP transport error
    #[display("{_0}")]
    Http(HttpError),
}

/// Learner error with kind discrimination.
#[derive(Debug, derive_more::Display)]
#[display("Learner Error: {_0}")]
pub struct LearnerError(Box<LearnerErrorKind>);

impl LearnerError {
    /// Create a new error from a kind.
    pub fn new(kind: LearnerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LearnerErrorKind {
        &self.0
    }
}

impl std::error::Error for LearnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            LearnerErrorKind::Config(e) => Some(e),
            LearnerErrorKind::Retrieval(e) => Some(e),
            LearnerErrorKind::Generation(e) => Some(e),
            LearnerErrorKind::Delivery(e) => Some(e),
            LearnerErrorKind::Http(e) => Some(e),
        }
    }
}

// Generic From implementation for any type that converts to LearnerErrorKind
impl<T> From<T> for LearnerError
where
    T: Into<LearnerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Learner operations.
pub type LearnerResult<T> = std::result::Result<T, LearnerError>;
