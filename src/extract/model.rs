//! Model-assisted slot extraction via one labelled-line chat call.
//!
//! The prompt instructs the model to answer with exactly three labelled
//! lines (`Source:`, `Destination:`, `Days:`). Parsing scans the reply line
//! by line, matches the label prefixes case-insensitively, and takes the
//! trimmed substring after the first colon. A missing or empty line is an
//! extraction failure; an unparsable `Days:` value is `DaysUnresolved` —
//! this extractor never assumes a default day count.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::extract::days::parse_days;
use crate::extract::intent::IntentDetector;
use crate::extract::{ExtractError, SlotExtractor, TravelSlots};
use crate::llm::{ChatClient, ChatRequest};

// ---------------------------------------------------------------------------
// ModelExtractor
// ---------------------------------------------------------------------------

/// Delegates slot extraction to the main model.
///
/// The intent slot still comes from the local keyword detector — the remote
/// prompt only covers route and day count.
pub struct ModelExtractor {
    client: Arc<dyn ChatClient>,
    model: String,
    max_tokens: u32,
    intents: IntentDetector,
}

impl ModelExtractor {
    /// Build an extractor that calls `client` with the main model and the
    /// extraction token ceiling from `config`.
    pub fn new(client: Arc<dyn ChatClient>, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.main_model.clone(),
            max_tokens: config.extract_max_tokens,
            intents: IntentDetector::new(),
        }
    }

    fn prompt(sentence: &str) -> String {
        format!(
            "Extract travel details.\n\
             \n\
             Sentence: {sentence}\n\
             \n\
             Return ONLY:\n\
             Source:\n\
             Destination:\n\
             Days:\n"
        )
    }
}

/// Pull the value of a `label:`-prefixed line out of the model reply.
///
/// Matching is case-insensitive on the line prefix; the value is everything
/// after the first colon, trimmed. Empty values are treated as missing.
fn labelled_value(output: &str, label: &str) -> Option<String> {
    let label_lower = label.to_lowercase();
    output.lines().find_map(|line| {
        let trimmed = line.trim();
        if !trimmed.to_lowercase().starts_with(&label_lower) {
            return None;
        }
        let value = trimmed.split_once(':')?.1.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

#[async_trait]
impl SlotExtractor for ModelExtractor {
    async fn extract(&self, text: &str) -> Result<TravelSlots, ExtractError> {
        let request = ChatRequest::new(&self.model, Self::prompt(text), self.max_tokens);
        let output = self.client.complete(request).await?;

        log::debug!("extraction reply:\n{output}");

        let source = labelled_value(&output, "source");
        let destination = labelled_value(&output, "destination");
        let days_text = labelled_value(&output, "days");

        let (source, destination, days_text) = match (source, destination, days_text) {
            (Some(s), Some(d), Some(t)) => (s, d, t),
            _ => return Err(ExtractError::MissingSlots),
        };

        let days = parse_days(&days_text).ok_or(ExtractError::DaysUnresolved)?;

        Ok(TravelSlots {
            source: Some(source),
            destination: Some(destination),
            days: Some(days),
            intent: self.intents.detect(text),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::TravelIntent;
    use crate::llm::{LlmError, ScriptedClient};

    fn extractor(client: Arc<ScriptedClient>) -> ModelExtractor {
        ModelExtractor::new(client, &LlmConfig::default())
    }

    #[tokio::test]
    async fn parses_three_labelled_lines() {
        let client = Arc::new(ScriptedClient::always(
            "Source: Delhi\nDestination: Paris\nDays: 3",
        ));
        let e = extractor(Arc::clone(&client));

        let slots = e.extract("3 days from delhi to paris").await.unwrap();
        assert_eq!(slots.source.as_deref(), Some("Delhi"));
        assert_eq!(slots.destination.as_deref(), Some("Paris"));
        assert_eq!(slots.days, Some(3));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn label_matching_is_case_insensitive() {
        let client = Arc::new(ScriptedClient::always(
            "SOURCE: Tokyo\ndestination: Osaka\nDAYS: two",
        ));
        let e = extractor(client);

        let slots = e.extract("anything").await.unwrap();
        assert_eq!(slots.source.as_deref(), Some("Tokyo"));
        assert_eq!(slots.destination.as_deref(), Some("Osaka"));
        // "two" resolves through the word table
        assert_eq!(slots.days, Some(2));
    }

    #[tokio::test]
    async fn surrounding_prose_is_tolerated() {
        let client = Arc::new(ScriptedClient::always(
            "Here are the details:\nSource: Rome\nDestination: Milan\nDays: 4 days\nDone.",
        ));
        let e = extractor(client);

        let slots = e.extract("x").await.unwrap();
        assert_eq!(slots.days, Some(4));
    }

    #[tokio::test]
    async fn missing_days_line_is_missing_slots() {
        let client = Arc::new(ScriptedClient::always(
            "Source: Delhi\nDestination: Paris",
        ));
        let e = extractor(client);

        let err = e.extract("x").await.unwrap_err();
        assert!(matches!(err, ExtractError::MissingSlots));
    }

    #[tokio::test]
    async fn empty_value_counts_as_missing() {
        let client = Arc::new(ScriptedClient::always(
            "Source: Delhi\nDestination:\nDays: 3",
        ));
        let e = extractor(client);

        let err = e.extract("x").await.unwrap_err();
        assert!(matches!(err, ExtractError::MissingSlots));
    }

    #[tokio::test]
    async fn unparsable_days_is_days_unresolved_never_defaulted() {
        let client = Arc::new(ScriptedClient::always(
            "Source: Delhi\nDestination: Paris\nDays: a fortnight",
        ));
        let e = extractor(client);

        let err = e.extract("x").await.unwrap_err();
        assert!(matches!(err, ExtractError::DaysUnresolved));
    }

    #[tokio::test]
    async fn llm_failure_propagates() {
        let client = Arc::new(ScriptedClient::new(vec![Err(LlmError::Timeout)]));
        let e = extractor(client);

        let err = e.extract("x").await.unwrap_err();
        assert!(matches!(err, ExtractError::Llm(LlmError::Timeout)));
    }

    #[tokio::test]
    async fn intent_is_detected_locally() {
        let client = Arc::new(ScriptedClient::always(
            "Source: Kathmandu\nDestination: Lukla\nDays: 10",
        ));
        let e = extractor(client);

        let slots = e.extract("a 10 days trekking trip").await.unwrap();
        assert_eq!(slots.intent, TravelIntent::Adventure);
    }

    #[tokio::test]
    async fn request_carries_extraction_ceiling_and_main_model() {
        let client = Arc::new(ScriptedClient::always(
            "Source: A\nDestination: B\nDays: 1",
        ));
        let config = LlmConfig::default();
        let e = ModelExtractor::new(Arc::clone(&client) as Arc<dyn ChatClient>, &config);

        e.extract("1 day from a to b").await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].model, config.main_model);
        assert_eq!(calls[0].max_tokens, config.extract_max_tokens);
        assert!(calls[0].user.contains("Sentence: 1 day from a to b"));
    }
}
