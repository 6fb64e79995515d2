//! Chat conversation capability.

use async_trait::async_trait;
use learner_error::DeliveryError;

/// Handle to the chat message that triggered a query.
#[async_trait]
pub trait Conversation: Send + Sync {
    /// Send `text` as a reply to the originating message.
    ///
    /// The caller is responsible for keeping `text` within the platform's
    /// length limit.
    ///
    /// # Errors
    ///
    /// Returns error if the platform rejects or fails to deliver the message.
    async fn reply(&self, text: &str) -> Result<(), DeliveryError>;

    /// Show a typing indicator until the returned guard is dropped.
    fn start_typing(&self) -> TypingGuard;
}

/// Scoped typing indicator. Dropping the guard stops the indicator.
#[must_use = "the typing indicator stops as soon as the guard is dropped"]
pub struct TypingGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl TypingGuard {
    /// Create a guard that runs `release` when dropped.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard for conversations without a typing indicator.
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl std::fmt::Debug for TypingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingGuard")
            .field("active", &self.release.is_some())
            .finish()
    }
}

impl Drop for TypingGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn guard_releases_exactly_once_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        let guard = TypingGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(released.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
