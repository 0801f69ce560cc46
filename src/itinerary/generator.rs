//! Itinerary generation — one prompt, one fatal remote call.
//!
//! The prompt pins down the output shape: day-wise sections, 3–4 activities
//! per day, short bullets, no emojis, no prose outside the plan. Generation
//! uses the main model with its own token ceiling, distinct from the
//! refinement call's. A failed call propagates as [`LlmError`] — the caller
//! aborts the turn, no retry happens here.

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::extract::TravelIntent;
use crate::itinerary::ItineraryDraft;
use crate::llm::{ChatClient, ChatRequest, LlmError};

// ---------------------------------------------------------------------------
// ItineraryGenerator
// ---------------------------------------------------------------------------

/// Builds day-wise travel plans via the main model.
pub struct ItineraryGenerator {
    client: Arc<dyn ChatClient>,
    model: String,
    max_tokens: u32,
}

impl ItineraryGenerator {
    /// Build a generator using the main model and generation token ceiling
    /// from `config`.
    pub fn new(client: Arc<dyn ChatClient>, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.main_model.clone(),
            max_tokens: config.generate_max_tokens,
        }
    }

    /// Generate a plan for a resolved route.
    pub async fn generate(
        &self,
        source: &str,
        destination: &str,
        days: u32,
        intent: TravelIntent,
    ) -> Result<ItineraryDraft, LlmError> {
        let route = format!("From: {source}\nDestination: {destination}\n");
        self.request(days, &route, intent).await
    }

    /// Generate a plan from a day count alone (no named locations).
    pub async fn generate_days_only(
        &self,
        days: u32,
        intent: TravelIntent,
    ) -> Result<ItineraryDraft, LlmError> {
        self.request(days, "", intent).await
    }

    async fn request(
        &self,
        days: u32,
        route: &str,
        intent: TravelIntent,
    ) -> Result<ItineraryDraft, LlmError> {
        let style = match intent {
            TravelIntent::General => String::new(),
            other => format!("Travel style: {}\n", other.label()),
        };

        let prompt = format!(
            "Create a {days}-day travel itinerary.\n\
             \n\
             {route}{style}\
             \n\
             Rules:\n\
             - Day-wise plan\n\
             - 3-4 activities per day\n\
             - Short bullet points\n\
             - No emojis\n\
             - No extra text\n\
             \n\
             Format:\n\
             \n\
             Day 1:\n\
             - activity\n\
             - activity\n\
             \n\
             Day 2:\n\
             - activity\n"
        );

        let request = ChatRequest::new(&self.model, prompt, self.max_tokens);
        let body = self.client.complete(request).await?;

        Ok(ItineraryDraft {
            day_count: days,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedClient;

    const PLAN: &str = "Day 1:\n- Eiffel Tower\n- Seine walk\n\nDay 2:\n- Louvre";

    fn generator(client: Arc<ScriptedClient>) -> ItineraryGenerator {
        ItineraryGenerator::new(client, &LlmConfig::default())
    }

    #[tokio::test]
    async fn generates_draft_with_day_count() {
        let client = Arc::new(ScriptedClient::always(PLAN));
        let g = generator(Arc::clone(&client));

        let draft = g
            .generate("Delhi", "Paris", 2, TravelIntent::General)
            .await
            .unwrap();

        assert_eq!(draft.day_count, 2);
        assert_eq!(draft.body, PLAN);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn prompt_carries_route_and_rules() {
        let client = Arc::new(ScriptedClient::always(PLAN));
        let g = generator(Arc::clone(&client));

        g.generate("Delhi", "Paris", 5, TravelIntent::General)
            .await
            .unwrap();

        let call = &client.calls()[0];
        assert!(call.user.contains("Create a 5-day travel itinerary."));
        assert!(call.user.contains("From: Delhi"));
        assert!(call.user.contains("Destination: Paris"));
        assert!(call.user.contains("3-4 activities per day"));
        assert!(call.user.contains("No emojis"));
        // General style adds no hint line
        assert!(!call.user.contains("Travel style:"));
    }

    #[tokio::test]
    async fn non_general_intent_adds_style_hint() {
        let client = Arc::new(ScriptedClient::always(PLAN));
        let g = generator(Arc::clone(&client));

        g.generate("Dubai", "Male", 7, TravelIntent::Luxury)
            .await
            .unwrap();

        assert!(client.calls()[0].user.contains("Travel style: luxury"));
    }

    #[tokio::test]
    async fn days_only_mode_omits_route_lines() {
        let client = Arc::new(ScriptedClient::always(PLAN));
        let g = generator(Arc::clone(&client));

        let draft = g.generate_days_only(3, TravelIntent::Relax).await.unwrap();
        assert_eq!(draft.day_count, 3);

        let call = &client.calls()[0];
        assert!(call.user.contains("Create a 3-day travel itinerary."));
        assert!(!call.user.contains("From:"));
        assert!(!call.user.contains("Destination:"));
        assert!(call.user.contains("Travel style: relaxed"));
    }

    #[tokio::test]
    async fn request_uses_main_model_and_generation_ceiling() {
        let client = Arc::new(ScriptedClient::always(PLAN));
        let config = LlmConfig::default();
        let g = ItineraryGenerator::new(Arc::clone(&client) as Arc<dyn ChatClient>, &config);

        g.generate("A", "B", 1, TravelIntent::General).await.unwrap();

        let call = &client.calls()[0];
        assert_eq!(call.model, config.main_model);
        assert_eq!(call.max_tokens, config.generate_max_tokens);
    }

    #[tokio::test]
    async fn call_failure_propagates_unchanged() {
        let client = Arc::new(ScriptedClient::new(vec![Err(LlmError::Status {
            code: 502,
            body: "bad gateway".into(),
        })]));
        let g = generator(client);

        let err = g
            .generate("A", "B", 1, TravelIntent::General)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Status { code: 502, .. }));
    }
}
