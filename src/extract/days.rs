//! Day-count parsing shared by both extraction strategies.
//!
//! A digit match always wins; failing that, the text is scanned for the
//! number words "one" through "ten" (case-insensitive substring match, same
//! tolerance the speech path needs for transcripts like "a three days
//! trip"). A zero day count is rejected — trips are at least one day.

use std::sync::OnceLock;

use regex::Regex;

/// Number-word lookup table, scanned in order.
const WORD_NUMBERS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

fn digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// Parse a day count out of `text`.
///
/// Returns `None` when neither a positive integer nor a recognised number
/// word is present — the caller decides whether that means a configured
/// default or a "days not understood" failure.
pub fn parse_days(text: &str) -> Option<u32> {
    if let Some(m) = digits().find(text) {
        // Leading zeros / overflow parse failures fall through to words.
        if let Ok(n) = m.as_str().parse::<u32>() {
            if n > 0 {
                return Some(n);
            }
        }
    }

    let lower = text.to_lowercase();
    WORD_NUMBERS
        .iter()
        .find(|(word, _)| lower.contains(word))
        .map(|&(_, n)| n)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
