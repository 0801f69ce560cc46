//! Remote language-model access for the travel concierge.
//!
//! This module provides:
//! * [`ChatClient`] — async trait implemented by all chat-completions backends.
//! * [`ApiClient`] — OpenAI-compatible REST client (OpenRouter, OpenAI, …).
//! * [`ChatRequest`] — per-call model identifier, message pair and token ceiling.
//! * [`LlmError`] — error variants for remote calls.
//!
//! Every pipeline step (extraction, generation, refinement, kind probing)
//! goes through one shared `Arc<dyn ChatClient>`; the step supplies its own
//! model and `max_tokens` via [`ChatRequest`], so the main and secondary
//! models stay independently configurable.

pub mod client;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiClient, ChatClient, ChatRequest, LlmError};

// test-only re-export so other modules' tests can import the scripted double
// without `use trip_concierge::llm::client::ScriptedClient`.
#[cfg(test)]
pub use client::ScriptedClient;
