//! Regex-based slot extraction — no network, deterministic.
//!
//! Day count: first integer, then number words, then the configured default
//! (if any). Route: a case-insensitive `from <word> to <word>` pattern, both
//! ends titlecased. Intent: keyword sets via [`IntentDetector`].
//!
//! The configured `default_days` makes the silent-default behaviour explicit
//! and optional: `Some(3)` reproduces the permissive variant, `None` makes an
//! unparsable day count a reportable [`ExtractError::DaysUnresolved`].

use async_trait::async_trait;
use regex::Regex;

use crate::extract::days::parse_days;
use crate::extract::intent::IntentDetector;
use crate::extract::{ExtractError, SlotExtractor, TravelSlots};

// ---------------------------------------------------------------------------
// HeuristicExtractor
// ---------------------------------------------------------------------------

/// Pure-regex slot extractor.
///
/// # Example
/// ```rust,no_run
/// use trip_concierge::extract::{HeuristicExtractor, SlotExtractor};
///
/// # async fn example() {
/// let extractor = HeuristicExtractor::new(Some(3));
/// let slots = extractor
///     .extract("plan a 5 days trip from delhi to paris")
///     .await
///     .unwrap();
/// assert_eq!(slots.days, Some(5));
/// assert_eq!(slots.source.as_deref(), Some("Delhi"));
/// # }
/// ```
pub struct HeuristicExtractor {
    route: Regex,
    default_days: Option<u32>,
    intents: IntentDetector,
}

impl HeuristicExtractor {
    /// Build an extractor. `default_days` is assumed when the text contains
    /// neither a digit nor a number word; pass `None` to report
    /// `DaysUnresolved` instead.
    pub fn new(default_days: Option<u32>) -> Self {
        Self {
            route: Regex::new(r"(?i)\bfrom\s+(\w+)\s+to\s+(\w+)").unwrap(),
            default_days,
            intents: IntentDetector::new(),
        }
    }

    fn route_slots(&self, text: &str) -> (Option<String>, Option<String>) {
        match self.route.captures(text) {
            Some(caps) => (
                Some(title_case(&caps[1])),
                Some(title_case(&caps[2])),
            ),
            None => (None, None),
        }
    }
}

#[async_trait]
impl SlotExtractor for HeuristicExtractor {
    async fn extract(&self, text: &str) -> Result<TravelSlots, ExtractError> {
        let days = match parse_days(text).or(self.default_days) {
            Some(n) => Some(n),
            None => return Err(ExtractError::DaysUnresolved),
        };

        let (source, destination) = self.route_slots(text);
        let intent = self.intents.detect(text);

        Ok(TravelSlots {
            source,
            destination,
            days,
            intent,
        })
    }
}

/// Uppercase the first character, lowercase the rest ("delhi" → "Delhi").
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::TravelIntent;

    #[tokio::test]
    async fn full_request_resolves_all_slots() {
        let e = HeuristicExtractor::new(Some(3));
        let slots = e
            .extract("plan a 5 days trip from delhi to paris")
            .await
            .unwrap();

        assert_eq!(slots.days, Some(5));
        assert_eq!(slots.source.as_deref(), Some("Delhi"));
        assert_eq!(slots.destination.as_deref(), Some("Paris"));
        assert_eq!(slots.intent, TravelIntent::General);
        assert!(slots.is_complete());
    }

    #[tokio::test]
    async fn route_is_titlecased_regardless_of_input_case() {
        let e = HeuristicExtractor::new(Some(3));
        let slots = e.extract("2 days FROM TOKYO TO OSAKA").await.unwrap();
        assert_eq!(slots.source.as_deref(), Some("Tokyo"));
        assert_eq!(slots.destination.as_deref(), Some("Osaka"));
    }

    #[tokio::test]
    async fn number_word_resolves_day_count() {
        let e = HeuristicExtractor::new(None);
        let slots = e
            .extract("three days from rome to florence")
            .await
            .unwrap();
        assert_eq!(slots.days, Some(3));
    }

    #[tokio::test]
    async fn missing_days_uses_configured_default() {
        let e = HeuristicExtractor::new(Some(3));
        let slots = e.extract("a trip from delhi to goa").await.unwrap();
        assert_eq!(slots.days, Some(3));
    }

    #[tokio::test]
    async fn missing_days_without_default_is_unresolved() {
        let e = HeuristicExtractor::new(None);
        let err = e.extract("a trip from delhi to goa").await.unwrap_err();
        assert!(matches!(err, ExtractError::DaysUnresolved));
    }

    #[tokio::test]
    async fn missing_route_leaves_both_ends_unset() {
        let e = HeuristicExtractor::new(Some(3));
        let slots = e.extract("a 4 days beach holiday").await.unwrap();
        assert_eq!(slots.source, None);
        assert_eq!(slots.destination, None);
        assert!(!slots.is_complete());
        // intent still detected
        assert_eq!(slots.intent, TravelIntent::Relax);
    }

    #[tokio::test]
    async fn intent_keywords_flow_through() {
        let e = HeuristicExtractor::new(Some(3));
        let slots = e
            .extract("a luxury 7 days trip from dubai to male")
            .await
            .unwrap();
        assert_eq!(slots.intent, TravelIntent::Luxury);
        assert_eq!(slots.days, Some(7));
    }

    #[test]
    fn title_case_handles_edge_cases() {
        assert_eq!(title_case("delhi"), "Delhi");
        assert_eq!(title_case("PARIS"), "Paris");
        assert_eq!(title_case("x"), "X");
        assert_eq!(title_case(""), "");
    }
}
