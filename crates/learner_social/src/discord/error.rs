//! Discord-specific error types.

use learner_error::DeliveryError;
use std::fmt;

/// Discord error variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiscordErrorKind {
    /// Serenity API error (e.g., HTTP error, gateway error, rate limit).
    SerenityError(String),

    /// Connection to Discord gateway failed.
    ConnectionFailed(String),

    /// Bot token is missing or malformed.
    InvalidToken,

    /// Message failed to send.
    MessageSendFailed(String),
}

impl fmt::Display for DiscordErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SerenityError(msg) => write!(f, "Serenity API error: {msg}"),
            Self::ConnectionFailed(msg) => write!(f, "Connection failed: {msg}"),
            Self::InvalidToken => write!(f, "Missing or malformed bot token"),
            Self::MessageSendFailed(msg) => write!(f, "Message send failed: {msg}"),
        }
    }
}

/// Discord error with source location tracking.
#[derive(Debug, Clone)]
pub struct DiscordError {
    /// What went wrong
    pub kind: DiscordErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl DiscordError {
    /// Create a new DiscordError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DiscordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl fmt::Display for DiscordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Discord Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for DiscordError {}

/// Result type for Discord operations.
pub type DiscordResult<T> = Result<T, DiscordError>;

impl From<serenity::Error> for DiscordError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        DiscordError::new(DiscordErrorKind::SerenityError(err.to_string()))
    }
}

impl From<DiscordError> for DeliveryError {
    #[track_caller]
    fn from(err: DiscordError) -> Self {
        DeliveryError::new(err.kind.to_string())
    }
}
