//! Distance-banded response strategy selection.

use learner_core::RouterConfig;

/// Response strategy chosen for a retrieval distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Route {
    /// Confident match: generate an answer without an interim message.
    #[display("direct")]
    Direct,
    /// Weak match: acknowledge first, then generate.
    #[display("hedged")]
    Hedged,
    /// No usable match: ask the user to rephrase and stop.
    #[display("clarify")]
    Clarify,
}

impl Route {
    /// Whether this route runs generation.
    pub fn generates(self) -> bool {
        !matches!(self, Route::Clarify)
    }
}

/// Classifies retrieval distances into [`Route`]s.
///
/// Bands are closed-open on their lower bound, so a distance equal to
/// `direct_below` is hedged and one equal to `clarify_at_or_above` asks for
/// clarification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceRouter {
    direct_below: f64,
    clarify_at_or_above: f64,
}

impl ConfidenceRouter {
    /// Build a router from configured thresholds.
    pub fn new(config: &RouterConfig) -> Self {
        Self {
            direct_below: *config.direct_below(),
            clarify_at_or_above: *config.clarify_at_or_above(),
        }
    }

    /// Pick the route for `distance`.
    ///
    /// A NaN distance compares false against both bounds and falls through
    /// to [`Route::Clarify`].
    pub fn route(&self, distance: f64) -> Route {
        if distance < self.direct_below {
            Route::Direct
        } else if distance < self.clarify_at_or_above {
            Route::Hedged
        } else {
            Route::Clarify
        }
    }
}

impl Default for ConfidenceRouter {
    fn default() -> Self {
        Self::new(&RouterConfig::default())
    }
}
