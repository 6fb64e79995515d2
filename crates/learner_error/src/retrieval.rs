//! Retrieval error types.

/// Specific error conditions for document retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RetrievalErrorKind {
    /// The knowledge base holds no documents.
    #[display("Knowledge base is empty")]
    EmptyKnowledgeBase,
    /// Embedding the query or a document failed.
    #[display("Embedding failed: {_0}")]
    Embedding(String),
    /// The retriever produced a result that violates its contract.
    #[display("Malformed retrieval result: {_0}")]
    Malformed(String),
    /// Any other retriever backend failure.
    #[display("Retriever backend error: {_0}")]
    Backend(String),
}

/// Retrieval error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Retrieval Error: {} at line {} in {}", kind, line, file)]
pub struct RetrievalError {
    kind: RetrievalErrorKind,
    line: u32,
    file: &'static str,
}

impl RetrievalError {
    /// Create a new retrieval error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RetrievalErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RetrievalErrorKind {
        &self.kind
    }
}

impl From<RetrievalErrorKind> for RetrievalError {
    #[track_caller]
    fn from(kind: RetrievalErrorKind) -> Self {
        Self::new(kind)
    }
}
