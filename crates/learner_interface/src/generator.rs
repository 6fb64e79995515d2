//! Generator capability.

use learner_core::{GenerationRequest, GenerationResult};
use learner_error::GenerationError;

/// Context-conditioned text completion.
///
/// Implementations are synchronous and may block for a long time; callers
/// run them on a dedicated worker rather than on the event loop.
pub trait Generator: Send + Sync + 'static {
    /// Answer `request.query()` using `request.document()` as context.
    ///
    /// The returned text ends before the earliest stop sequence in
    /// `request.params()`.
    ///
    /// # Errors
    ///
    /// Returns error if the model backend fails.
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError>;
}
