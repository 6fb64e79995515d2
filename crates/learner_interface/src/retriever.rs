//! Retriever capability.

use async_trait::async_trait;
use learner_core::{Query, RetrievalResult};
use learner_error::RetrievalError;

/// Nearest-document lookup by semantic similarity.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return the single document nearest to `query`.
    ///
    /// Repeated calls with the same query must land in the same distance
    /// band.
    ///
    /// # Errors
    ///
    /// Returns error if the backing index or embedding model fails.
    async fn retrieve(&self, query: &Query) -> Result<RetrievalResult, RetrievalError>;
}
