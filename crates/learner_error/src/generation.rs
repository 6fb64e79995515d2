//! Generation error types.

use std::time::Duration;

/// Error kinds for the generation worker and the generator backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The generator returned an error.
    #[display("Generation failed: {_0}")]
    Failed(String),
    /// The generator panicked inside the worker.
    #[display("Generation panicked: {_0}")]
    Panicked(String),
    /// The computation did not finish within the configured timeout.
    #[display("Generation timed out after {_0:?}")]
    TimedOut(Duration),
    /// The worker has shut down and accepts no more submissions.
    #[display("Generation worker is unavailable")]
    WorkerUnavailable,
}

/// Generation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    kind: GenerationErrorKind,
    line: u32,
    file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GenerationErrorKind {
        &self.kind
    }
}

impl From<GenerationErrorKind> for GenerationError {
    #[track_caller]
    fn from(kind: GenerationErrorKind) -> Self {
        Self::new(kind)
    }
}
