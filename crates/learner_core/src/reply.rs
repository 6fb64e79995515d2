//! Outgoing reply type.

/// Truncate `text` to at most `max_chars` characters.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Final text sent back to the chat platform, capped at the message limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingReply {
    text: String,
}

impl OutgoingReply {
    /// Build a reply, cutting the tail of `text` beyond `max_chars`.
    pub fn capped(text: impl AsRef<str>, max_chars: usize) -> Self {
        Self {
            text: truncate_chars(text.as_ref(), max_chars).to_string(),
        }
    }

    /// The reply text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
