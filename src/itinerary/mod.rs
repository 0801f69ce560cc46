//! Itinerary generation and optional refinement.
//!
//! [`ItineraryGenerator`] turns resolved travel slots into a day-wise plan
//! with one remote call (fatal on failure). [`ItineraryRefiner`] runs the
//! optional reformatting pass whose failure silently degrades to the
//! unrefined draft — the [`Refined`] result records which path was taken.

pub mod generator;
pub mod refiner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use generator::ItineraryGenerator;
pub use refiner::{ItineraryRefiner, Refined};

// ---------------------------------------------------------------------------
// ItineraryDraft / Itinerary
// ---------------------------------------------------------------------------

/// The plan text as returned by the generator, before refinement.
///
/// `body` is expected (not guaranteed) to contain `day_count` day sections —
/// the model usually honours the prompt but nothing enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryDraft {
    pub day_count: u32,
    pub body: String,
}

/// The final plan held by the session: the draft after optional refinement.
///
/// `refined == false` records that the refinement pass fell back to the
/// draft verbatim (explicit marker, assertable in tests).
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub day_count: u32,
    pub body: String,
    pub refined: bool,
}

impl Itinerary {
    /// Combine a draft with its refinement outcome.
    pub fn from_draft(draft: ItineraryDraft, refined: Refined) -> Self {
        let was_refined = refined.was_refined();
        Self {
            day_count: draft.day_count,
            body: refined.into_text(),
            refined: was_refined,
        }
    }
}
