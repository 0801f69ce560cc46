//! Pipeline orchestration — session state machine and the turn runner.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TripOrchestrator                        │
//! │                                                             │
//! │  input ──▶ TextNormalizer ──▶ SlotExtractor ──▶ Generator   │
//! │                                                    │        │
//! │                    SessionState ◀── Refiner ◀──────┘        │
//! │                         │                                   │
//! │                         └──▶ SpeechFormatter ──▶ Synthesizer│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The orchestrator owns every component behind its trait and is the only
//! writer of [`SessionState`]. See [`TurnPhase`] for the state machine.

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{TripOrchestrator, TurnError};
pub use state::{ConversationTurn, Role, SessionState, TurnPhase};
