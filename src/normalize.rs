//! Text normalisation for transcribed or typed travel requests.
//!
//! [`TextNormalizer`] fixes the mis-transcriptions that matter downstream
//! before the slot extractor sees the text: whitespace runs are collapsed,
//! `"3d"` / `"3 d"` becomes `"3 days"`, and the standalone word `"day"` is
//! pluralised so the day-count parser only has one shape to deal with.
//!
//! Normalisation is pure and total — it never fails, and at worst returns
//! the trimmed input unchanged.

use regex::Regex;

// ---------------------------------------------------------------------------
// TravelRequest
// ---------------------------------------------------------------------------

/// One user turn's input, raw and normalised. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelRequest {
    /// The text exactly as spoken/typed.
    pub raw: String,
    /// The cleaned text the extractor operates on.
    pub normalized: String,
}

// ---------------------------------------------------------------------------
// TextNormalizer
// ---------------------------------------------------------------------------

/// Normalises raw request text ahead of slot extraction.
///
/// # Example
/// ```rust
/// use trip_concierge::normalize::TextNormalizer;
///
/// let n = TextNormalizer::new();
/// assert_eq!(n.normalize("plan a  3d trip"), "plan a 3 days trip");
/// ```
pub struct TextNormalizer {
    whitespace: Regex,
    short_days: Regex,
    day_word: Regex,
}

impl TextNormalizer {
    /// Build a normaliser with the standard rewrite rules.
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").unwrap(),
            short_days: Regex::new(r"\b(\d+)\s*d\b").unwrap(),
            day_word: Regex::new(r"\bday\b").unwrap(),
        }
    }

    /// Clean `raw`: collapse whitespace, trim, and apply the day rewrites.
    pub fn normalize(&self, raw: &str) -> String {
        let text = self.whitespace.replace_all(raw, " ");
        let text = self.short_days.replace_all(&text, "$1 days");
        let text = self.day_word.replace_all(&text, "days");
        text.trim().to_string()
    }

    /// Bundle `raw` with its normalised form as a [`TravelRequest`].
    pub fn request(&self, raw: &str) -> TravelRequest {
        TravelRequest {
            raw: raw.to_string(),
            normalized: self.normalize(raw),
        }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
