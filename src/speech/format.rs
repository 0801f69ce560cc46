//! Speech formatting — flattens itinerary text into a speakable string.
//!
//! Two strategies, selected by [`SpeechStyle`]:
//!
//! * `Structural` — walk the plan line by line: blank lines are dropped,
//!   `Day N` headings become `"Day N."`, bullet lines become the bullet body
//!   plus a period, anything else gets a trailing period. Lines are joined
//!   with single spaces, then whitespace runs and period runs collapse.
//! * `StripTruncate` — remove markdown emphasis/code markers and collapse
//!   whitespace.
//!
//! Both end with a hard truncation to the configured character budget so
//! synthesis latency and cost stay bounded. Formatting is pure and total.

use regex::Regex;

use crate::config::{SpeechConfig, SpeechStyle};

// ---------------------------------------------------------------------------
// SpeechFormatter
// ---------------------------------------------------------------------------

/// Converts itinerary text into speech-ready text.
///
/// # Example
/// ```rust
/// use trip_concierge::config::SpeechConfig;
/// use trip_concierge::speech::SpeechFormatter;
///
/// let f = SpeechFormatter::from_config(&SpeechConfig::default());
/// assert_eq!(f.to_speech("Day 1\n- walk\n- eat"), "Day 1. walk. eat.");
/// ```
pub struct SpeechFormatter {
    style: SpeechStyle,
    max_chars: usize,
    day_heading: Regex,
    digits: Regex,
    whitespace: Regex,
    period_runs: Regex,
    markdown: Regex,
}

impl SpeechFormatter {
    /// Build a formatter from the speech settings.
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.style, config.max_chars)
    }

    /// Build a formatter with an explicit style and character budget.
    pub fn new(style: SpeechStyle, max_chars: usize) -> Self {
        Self {
            style,
            max_chars,
            day_heading: Regex::new(r"(?i)^day\s*\d+").unwrap(),
            digits: Regex::new(r"\d+").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
            period_runs: Regex::new(r"\.\.+").unwrap(),
            markdown: Regex::new(r"[*_`#]").unwrap(),
        }
    }

    /// Flatten `text` for synthesis, truncated to the character budget.
    pub fn to_speech(&self, text: &str) -> String {
        let flat = match self.style {
            SpeechStyle::Structural => self.structural(text),
            SpeechStyle::StripTruncate => self.strip(text),
        };
        truncate_chars(flat, self.max_chars)
    }

    fn structural(&self, text: &str) -> String {
        let mut sentences: Vec<String> = Vec::new();

        for line in text.trim().lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if self.day_heading.is_match(line) {
                // Heading keeps only "Day N." — activity detail follows on
                // the bullet lines.
                if let Some(num) = self.digits.find(line) {
                    sentences.push(format!("Day {}.", num.as_str()));
                    continue;
                }
            }

            if let Some(body) = line.strip_prefix('-') {
                sentences.push(format!("{}.", body.trim()));
            } else {
                sentences.push(format!("{line}."));
            }
        }

        let speech = sentences.join(" ");
        let speech = self.whitespace.replace_all(&speech, " ");
        let speech = self.period_runs.replace_all(&speech, ".");
        speech.trim().to_string()
    }

    fn strip(&self, text: &str) -> String {
        let stripped = self.markdown.replace_all(text, "");
        let collapsed = self.whitespace.replace_all(&stripped, " ");
        collapsed.trim().to_string()
    }
}

/// Truncate to `max_chars` characters without splitting a code point.
fn truncate_chars(mut text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            text.truncate(byte_index);
            text
        }
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
