//! Optional refinement pass — reformat only, never fail the turn.
//!
//! The refiner sends the generated plan to the secondary model with a
//! strict reformatting prompt (no new information, same meaning, tidy
//! bullets). Any failure — transport error, non-success status, timeout,
//! or an empty/whitespace-only reply — degrades to the original text
//! unchanged. That fallback is a hard contract, and [`Refined`] makes the
//! taken path explicit so tests can assert on it.

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::llm::{ChatClient, ChatRequest};

// ---------------------------------------------------------------------------
// Refined
// ---------------------------------------------------------------------------

/// Outcome of a refinement attempt: the polished text, or the original
/// passed through because refinement failed or returned nothing usable.
#[derive(Debug, Clone, PartialEq)]
pub enum Refined {
    /// The secondary model produced usable reformatted text.
    Polished(String),
    /// Fallback path — the input text, verbatim.
    Original(String),
}

impl Refined {
    /// `true` when the polished path was taken.
    pub fn was_refined(&self) -> bool {
        matches!(self, Refined::Polished(_))
    }

    /// Unwrap to the text either way.
    pub fn into_text(self) -> String {
        match self {
            Refined::Polished(text) | Refined::Original(text) => text,
        }
    }
}

// ---------------------------------------------------------------------------
// ItineraryRefiner
// ---------------------------------------------------------------------------

/// Reformatting pass over the generated itinerary. Pure enhancement: this
/// step never returns an error.
pub struct ItineraryRefiner {
    client: Arc<dyn ChatClient>,
    model: String,
    max_tokens: u32,
}

impl ItineraryRefiner {
    /// Build a refiner using the secondary model and refinement token
    /// ceiling from `config`.
    pub fn new(client: Arc<dyn ChatClient>, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.refine_model.clone(),
            max_tokens: config.refine_max_tokens,
        }
    }

    fn prompt(text: &str) -> String {
        format!(
            "Clean and format the text below.\n\
             Do NOT add new information.\n\
             Keep meaning same.\n\
             Use clean bullet points.\n\
             \n\
             TEXT:\n\
             {text}\n"
        )
    }

    /// Refine `text`, falling back to it unchanged on any failure.
    pub async fn refine(&self, text: &str) -> Refined {
        let request = ChatRequest::new(&self.model, Self::prompt(text), self.max_tokens);

        match self.client.complete(request).await {
            Ok(polished) if !polished.trim().is_empty() => Refined::Polished(polished),
            Ok(_) => {
                log::warn!("refinement returned empty text — keeping the draft");
                Refined::Original(text.to_string())
            }
            Err(e) => {
                log::warn!("refinement failed ({e}) — keeping the draft");
                Refined::Original(text.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, ScriptedClient};

    const DRAFT: &str = "Day 1:\n-  walk around\n- eat";

    fn refiner(client: Arc<ScriptedClient>) -> ItineraryRefiner {
        ItineraryRefiner::new(client, &LlmConfig::default())
    }

    #[tokio::test]
    async fn success_yields_polished_text() {
        let client = Arc::new(ScriptedClient::always("Day 1:\n- Walk around\n- Eat"));
        let r = refiner(client);

        let refined = r.refine(DRAFT).await;
        assert!(refined.was_refined());
        assert_eq!(refined.into_text(), "Day 1:\n- Walk around\n- Eat");
    }

    #[tokio::test]
    async fn request_failure_round_trips_the_draft() {
        let client = Arc::new(ScriptedClient::new(vec![Err(LlmError::Status {
            code: 500,
            body: "sad".into(),
        })]));
        let r = refiner(client);

        let refined = r.refine(DRAFT).await;
        assert!(!refined.was_refined());
        // round-trip identity under failure
        assert_eq!(refined.into_text(), DRAFT);
    }

    #[tokio::test]
    async fn timeout_round_trips_the_draft() {
        let client = Arc::new(ScriptedClient::new(vec![Err(LlmError::Timeout)]));
        let r = refiner(client);

        assert_eq!(r.refine(DRAFT).await, Refined::Original(DRAFT.into()));
    }

    #[tokio::test]
    async fn whitespace_only_reply_round_trips_the_draft() {
        let client = Arc::new(ScriptedClient::always("   \n\t  "));
        let r = refiner(client);

        let refined = r.refine(DRAFT).await;
        assert!(!refined.was_refined());
        assert_eq!(refined.into_text(), DRAFT);
    }

    #[tokio::test]
    async fn uses_secondary_model_and_refine_ceiling() {
        let client = Arc::new(ScriptedClient::always("tidy"));
        let config = LlmConfig::default();
        let r = ItineraryRefiner::new(Arc::clone(&client) as Arc<dyn ChatClient>, &config);

        r.refine(DRAFT).await;

        let call = &client.calls()[0];
        assert_eq!(call.model, config.refine_model);
        assert_eq!(call.max_tokens, config.refine_max_tokens);
        assert!(call.user.contains("Do NOT add new information."));
        assert!(call.user.contains(DRAFT));
    }
}
