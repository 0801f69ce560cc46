//! Turn state machine and session state.
//!
//! [`TurnPhase`] tracks where the current turn is in the pipeline;
//! [`SessionState`] is everything the session owns: conversation history,
//! the single most-recent plan, the last audio artifact and the last error.
//! Both are owned exclusively by the orchestrator — no other component
//! mutates them.

use std::path::PathBuf;

use crate::itinerary::Itinerary;

// ---------------------------------------------------------------------------
// TurnPhase
// ---------------------------------------------------------------------------

/// States of the concierge pipeline.
///
/// The state machine transitions are:
///
/// ```text
/// Idle / AwaitingInput / Ready ──input──▶ Extracting
///   Extracting ──slots incomplete──▶ AwaitingInput  (turn aborts)
///   Extracting ──slots resolved───▶ Generating
///   Generating ──remote call fails─▶ AwaitingInput  (turn aborts)
///   Generating ──success──────────▶ Refining
///   Refining ──always completes───▶ Ready
///   Ready ──listen requested──────▶ Synthesizing
///   Synthesizing ──success────────▶ PlaybackReady
///   Synthesizing ──failure────────▶ Ready           (no audio, warn only)
/// any state ──reset──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Fresh session — nothing has happened yet.
    Idle,
    /// A previous turn ended (successfully or not); ready for input.
    AwaitingInput,
    /// Slot extraction is running on the normalised request.
    Extracting,
    /// The itinerary-generation remote call is in flight.
    Generating,
    /// The optional refinement pass is running (always completes).
    Refining,
    /// A plan is held; playback can be requested.
    Ready,
    /// Speech synthesis is running.
    Synthesizing,
    /// An audio artifact for the current plan is available.
    PlaybackReady,
}

impl TurnPhase {
    /// `true` while a turn (or synthesis) is actively processing.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            TurnPhase::Extracting
                | TurnPhase::Generating
                | TurnPhase::Refining
                | TurnPhase::Synthesizing
        )
    }

    /// A short human-readable label for status output.
    pub fn label(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "Idle",
            TurnPhase::AwaitingInput => "Awaiting input",
            TurnPhase::Extracting => "Extracting",
            TurnPhase::Generating => "Generating",
            TurnPhase::Refining => "Refining",
            TurnPhase::Ready => "Ready",
            TurnPhase::Synthesizing => "Synthesizing",
            TurnPhase::PlaybackReady => "Playback ready",
        }
    }
}

impl Default for TurnPhase {
    fn default() -> Self {
        TurnPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// ConversationTurn
// ---------------------------------------------------------------------------

/// Who said a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the append-only session history.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Everything the session owns across turns.
///
/// History is append-only and only cleared by [`reset`](Self::reset);
/// `last_plan` holds the single most-recent plan, overwritten each turn.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Current phase of the pipeline.
    pub phase: TurnPhase,
    /// Ordered conversation history.
    pub history: Vec<ConversationTurn>,
    /// The current plan, if any turn has completed.
    pub last_plan: Option<Itinerary>,
    /// Audio artifact for the current plan, if synthesis succeeded.
    pub last_audio: Option<PathBuf>,
    /// Message of the last turn-aborting or recovered error.
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn to history.
    pub fn push_user(&mut self, content: String) {
        self.history.push(ConversationTurn {
            role: Role::User,
            content,
        });
    }

    /// Append an assistant turn to history.
    pub fn push_assistant(&mut self, content: String) {
        self.history.push(ConversationTurn {
            role: Role::Assistant,
            content,
        });
    }

    /// Clear the whole session and return to `Idle`. Safe from any phase;
    /// clearing twice equals clearing once.
    pub fn reset(&mut self) {
        self.phase = TurnPhase::Idle;
        self.history.clear();
        self.last_plan = None;
        self.last_audio = None;
        self.last_error = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
