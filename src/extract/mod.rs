//! Slot extraction — turns a normalised travel request into structured fields.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                SlotExtractor (trait)                 │
//! │                                                     │
//! │   ┌────────────────────┐   ┌────────────────────┐   │
//! │   │ HeuristicExtractor │   │   ModelExtractor   │   │
//! │   │ regex route/days   │   │ Source:/Dest:/Days:│   │
//! │   │ keyword intent     │   │ labelled lines via │   │
//! │   │ optional default   │   │ one remote call    │   │
//! │   └────────────────────┘   └────────────────────┘   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Both implementations expose the same `slots-or-failure` result; the
//! orchestrator picks one from [`ExtractionMode`](crate::config::ExtractionMode)
//! at startup. Their day-count fallback policies deliberately differ: the
//! heuristic may silently assume a configured default, the model-assisted
//! extractor always reports `DaysUnresolved` instead.

use async_trait::async_trait;
use thiserror::Error;

use crate::llm::LlmError;

pub mod days;
pub mod heuristic;
pub mod intent;
pub mod kinds;
pub mod model;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use days::parse_days;
pub use heuristic::HeuristicExtractor;
pub use intent::{IntentDetector, TravelIntent};
pub use kinds::{KindProbe, RequestKind};
pub use model::ModelExtractor;

// ---------------------------------------------------------------------------
// TravelSlots
// ---------------------------------------------------------------------------

/// Structured fields derived from one travel request.
///
/// A slot the extractor could not determine is `None` — never an empty
/// string silently treated as valid. `days` is always positive when set.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelSlots {
    /// Trip origin, titlecased by the heuristic extractor.
    pub source: Option<String>,
    /// Trip destination.
    pub destination: Option<String>,
    /// Trip length in days.
    pub days: Option<u32>,
    /// Travel style detected from keywords.
    pub intent: TravelIntent,
}

impl TravelSlots {
    /// `true` when source, destination and day count all resolved.
    pub fn is_complete(&self) -> bool {
        self.source.is_some() && self.destination.is_some() && self.days.is_some()
    }

    /// `true` when the route (source + destination) resolved.
    pub fn has_route(&self) -> bool {
        self.source.is_some() && self.destination.is_some()
    }
}

// ---------------------------------------------------------------------------
// ExtractError
// ---------------------------------------------------------------------------

/// Failures the slot-extraction step can report.
///
/// `DaysUnresolved` is deliberately distinct from `MissingSlots` so the user
/// sees a specific message when only the day count defeated extraction.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// One or more required labelled fields were missing from the output.
    #[error("failed to extract travel details")]
    MissingSlots,

    /// The day count was present but unparsable as a digit or number word.
    #[error("could not understand the number of days")]
    DaysUnresolved,

    /// The extraction remote call itself failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
}

// ---------------------------------------------------------------------------
// SlotExtractor trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface over both extraction strategies.
///
/// `text` is expected to be normalised
/// (see [`TextNormalizer`](crate::normalize::TextNormalizer)).
#[async_trait]
pub trait SlotExtractor: Send + Sync {
    /// Extract travel slots from `text`, or report why extraction failed.
    async fn extract(&self, text: &str) -> Result<TravelSlots, ExtractError>;
}

// Compile-time assertion: Box<dyn SlotExtractor> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SlotExtractor>) {}
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
