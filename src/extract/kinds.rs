//! Best-effort multi-intent probe ("what else did the user ask for?").
//!
//! A single chat call asks which request kinds a sentence covers —
//! itinerary, flights, hotels, currency, translation — returned as a
//! comma-separated list. The probe is pure enhancement: any failure yields
//! an empty list and is never surfaced to the user.

use std::sync::Arc;

use crate::llm::{ChatClient, ChatRequest};

// ---------------------------------------------------------------------------
// RequestKind
// ---------------------------------------------------------------------------

/// One kind of request the concierge can recognise. Only `Itinerary` is
/// fulfilled today; the others produce a "not supported yet" notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Itinerary,
    Flights,
    Hotels,
    Currency,
    Translation,
}

impl RequestKind {
    /// Parse a single label from the model reply; unknown labels are skipped.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "itinerary" => Some(Self::Itinerary),
            "flights" => Some(Self::Flights),
            "hotels" => Some(Self::Hotels),
            "currency" => Some(Self::Currency),
            "translation" => Some(Self::Translation),
            _ => None,
        }
    }

    /// Human-readable label for notices and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Itinerary => "itinerary",
            Self::Flights => "flights",
            Self::Hotels => "hotels",
            Self::Currency => "currency",
            Self::Translation => "translation",
        }
    }
}

/// Parse a comma-separated kind list, skipping unknown labels and
/// de-duplicating while preserving order.
pub fn parse_kinds(output: &str) -> Vec<RequestKind> {
    let mut kinds = Vec::new();
    for part in output.split(',') {
        if let Some(kind) = RequestKind::from_label(part) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
    }
    kinds
}

// ---------------------------------------------------------------------------
// KindProbe
// ---------------------------------------------------------------------------

/// Asks the model which request kinds a sentence covers.
pub struct KindProbe {
    client: Arc<dyn ChatClient>,
    model: String,
    max_tokens: u32,
}

impl KindProbe {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens,
        }
    }

    fn prompt(sentence: &str) -> String {
        format!(
            "Analyze the user request and identify ALL intents.\n\
             \n\
             Possible intents:\n\
             - itinerary\n\
             - flights\n\
             - hotels\n\
             - currency\n\
             - translation\n\
             \n\
             Sentence:\n\
             {sentence}\n\
             \n\
             Return intents as a comma-separated list.\n\
             Example:\n\
             itinerary, flights\n"
        )
    }

    /// Detect the request kinds in `sentence`. Failures degrade to an empty
    /// list — this probe must never abort a turn.
    pub async fn detect(&self, sentence: &str) -> Vec<RequestKind> {
        let request = ChatRequest::new(&self.model, Self::prompt(sentence), self.max_tokens);
        match self.client.complete(request).await {
            Ok(output) => parse_kinds(&output),
            Err(e) => {
                log::debug!("kind probe failed (ignored): {e}");
                Vec::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
