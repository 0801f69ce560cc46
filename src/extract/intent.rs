//! Keyword-based travel-style detection.
//!
//! [`IntentDetector`] scans the request text for style keywords and returns
//! the first matching [`TravelIntent`] in a fixed priority order:
//! Adventure → Luxury → Budget → Relax. No match means `General`.

// ---------------------------------------------------------------------------
// TravelIntent
// ---------------------------------------------------------------------------

/// The travel style a request leans towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelIntent {
    Adventure,
    Luxury,
    Budget,
    Relax,
    /// No style keywords found.
    General,
}

impl TravelIntent {
    /// A short lowercase label used in prompts and logs.
    pub fn label(&self) -> &'static str {
        match self {
            TravelIntent::Adventure => "adventure",
            TravelIntent::Luxury => "luxury",
            TravelIntent::Budget => "budget",
            TravelIntent::Relax => "relaxed",
            TravelIntent::General => "general",
        }
    }
}

// ---------------------------------------------------------------------------
// Static intent definitions
// ---------------------------------------------------------------------------

struct IntentKeywords {
    intent: TravelIntent,
    keywords: &'static [&'static str],
}

/// Checked in order; the first intent with any keyword hit wins.
static INTENTS: &[IntentKeywords] = &[
    IntentKeywords {
        intent: TravelIntent::Adventure,
        keywords: &["adventure", "trek", "hiking"],
    },
    IntentKeywords {
        intent: TravelIntent::Luxury,
        keywords: &["luxury", "resort", "premium"],
    },
    IntentKeywords {
        intent: TravelIntent::Budget,
        keywords: &["budget", "cheap", "low cost"],
    },
    IntentKeywords {
        intent: TravelIntent::Relax,
        keywords: &["relax", "chill", "beach"],
    },
];

// ---------------------------------------------------------------------------
// IntentDetector
// ---------------------------------------------------------------------------

/// Detects the travel style of a request from keyword membership.
///
/// # Example
/// ```rust
/// use trip_concierge::extract::{IntentDetector, TravelIntent};
///
/// let detector = IntentDetector::new();
/// assert_eq!(
///     detector.detect("a trekking trip in nepal"),
///     TravelIntent::Adventure
/// );
/// ```
pub struct IntentDetector;

impl IntentDetector {
    /// Create a detector with the built-in keyword sets.
    pub fn new() -> Self {
        Self
    }

    /// Return the first matching intent in priority order, or `General`.
    pub fn detect(&self, text: &str) -> TravelIntent {
        let lower = text.to_lowercase();
        INTENTS
            .iter()
            .find(|set| set.keywords.iter().any(|kw| lower.contains(kw)))
            .map(|set| set.intent)
            .unwrap_or(TravelIntent::General)
    }
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_adventure() {
        let d = IntentDetector::new();
        assert_eq!(d.detect("a hiking trip to nepal"), TravelIntent::Adventure);
        assert_eq!(d.detect("I want some ADVENTURE"), TravelIntent::Adventure);
    }

    #[test]
    fn detects_luxury() {
        let d = IntentDetector::new();
        assert_eq!(d.detect("book a premium resort"), TravelIntent::Luxury);
    }

    #[test]
    fn detects_budget() {
        let d = IntentDetector::new();
        assert_eq!(d.detect("something cheap please"), TravelIntent::Budget);
        assert_eq!(d.detect("a low cost trip"), TravelIntent::Budget);
    }

    #[test]
    fn detects_relax() {
        let d = IntentDetector::new();
        assert_eq!(d.detect("just chill on a beach"), TravelIntent::Relax);
    }

    #[test]
    fn priority_order_first_match_wins() {
        let d = IntentDetector::new();
        // Adventure outranks Relax even when both keywords are present.
        assert_eq!(
            d.detect("beach trekking holiday"),
            TravelIntent::Adventure
        );
        // Luxury outranks Budget.
        assert_eq!(
            d.detect("a cheap luxury resort"),
            TravelIntent::Luxury
        );
    }

    #[test]
    fn no_keywords_means_general() {
        let d = IntentDetector::new();
        assert_eq!(d.detect("plan a trip to paris"), TravelIntent::General);
        assert_eq!(d.detect(""), TravelIntent::General);
    }
}
