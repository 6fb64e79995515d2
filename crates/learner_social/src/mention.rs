//! Mention-based message routing.

use learner_core::Query;

/// Decide whether a chat message is a question for the bot.
///
/// Returns `None` for the bot's own messages and for messages that do not
/// begin with a mention of the bot (`<@id>`, or the nickname form `<@!id>`).
/// Otherwise every mention of the bot is removed and the rest becomes the
/// query, which may be blank.
///
/// ```
/// use learner_social::route_message;
///
/// let query = route_message(7, 42, "<@42> what is a trait?").unwrap();
/// assert_eq!(query.as_str(), "what is a trait?");
///
/// assert!(route_message(42, 42, "<@42> talking to myself").is_none());
/// assert!(route_message(7, 42, "hey <@42>").is_none());
/// ```
pub fn route_message(author_id: u64, bot_id: u64, content: &str) -> Option<Query> {
    if author_id == bot_id {
        return None;
    }

    let plain = format!("<@{bot_id}>");
    let nickname = format!("<@!{bot_id}>");
    if !content.starts_with(&plain) && !content.starts_with(&nickname) {
        return None;
    }

    let stripped = content.replace(&nickname, "").replace(&plain, "");
    Some(Query::new(stripped))
}
