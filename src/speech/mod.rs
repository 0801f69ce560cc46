//! Speech I/O — output formatting, synthesis, and input capture.
//!
//! # Architecture
//!
//! ```text
//!                     plan text
//!                        │
//!                        ▼
//!              ┌───────────────────┐
//!              │  SpeechFormatter  │  structural rewrite or
//!              │                   │  strip-and-truncate
//!              └─────────┬─────────┘
//!                        ▼
//!              ┌───────────────────┐
//!              │ SpeechSynthesizer │  HTTP TTS + artifact cache,
//!              │      (trait)      │  or the unavailable stub
//!              └───────────────────┘
//!
//!              ┌───────────────────┐
//!              │   SpeechCapture   │  microphone → text,
//!              │      (trait)      │  or the unavailable stub
//!              └───────────────────┘
//! ```
//!
//! Capture and synthesis are blocking interfaces; the orchestrator runs
//! them on the blocking thread pool. Both are optional at runtime — the
//! `Unavailable*` stubs keep the text pipeline fully usable when no
//! microphone or TTS endpoint is configured.

pub mod capture;
pub mod format;
pub mod synth;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use capture::{CaptureError, SpeechCapture, UnavailableCapture};
pub use format::SpeechFormatter;
pub use synth::{HttpSynthesizer, SpeechSynthesizer, SynthError, UnavailableSynthesizer};

#[cfg(test)]
pub use capture::MockCapture;
#[cfg(test)]
pub use synth::MockSynthesizer;
