//! Retrieval result type.

use derive_getters::Getters;
use learner_error::{RetrievalError, RetrievalErrorKind};
use serde::{Deserialize, Serialize};

/// The single nearest reference document for a query.
///
/// Produced fresh for every query and owned by that query's handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RetrievalResult {
    /// Text used as generation context
    document: String,
    /// Human-readable identifier of where the document came from
    source: String,
    /// Dissimilarity between query and document, lower is more relevant
    distance: f64,
}

impl RetrievalResult {
    /// Create a retrieval result.
    pub fn new(document: impl Into<String>, source: impl Into<String>, distance: f64) -> Self {
        Self {
            document: document.into(),
            source: source.into(),
            distance,
        }
    }

    /// Reject results a retriever should never produce.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalErrorKind::Malformed`] when the distance is negative
    /// or not finite.
    pub fn validate(self) -> Result<Self, RetrievalError> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(RetrievalError::new(RetrievalErrorKind::Malformed(format!(
                "distance must be a finite non-negative number, got {}",
                self.distance
            ))));
        }
        Ok(self)
    }
}
