//! User-visible message texts.

/// Sent when the retrieved document is too far from the query to answer.
pub const CLARIFICATION_MESSAGE: &str = "Sorry, I didn't get you. Could you please try rephrasing or providing more context so that I can help better?";

/// Sent in place of an answer whenever generation or delivery fails.
pub const FALLBACK_MESSAGE: &str = "Sorry I faced some issue while getting back to you!";

/// Interim acknowledgment sent before a hedged answer.
pub fn hedge_message(source: &str) -> String {
    format!(
        "I am still learning and will try my best to answer you on what I know. \
         I am reading **{source}** to formulate an answer for you. Please give me a moment..."
    )
}

/// Explanatory text placed before every generated answer.
pub fn preamble(source: &str) -> String {
    format!(
        "This is what I was able to understand from {source}. \
         I still have a lot to learn, so please excuse me if I am wrong...\n\n"
    )
}
