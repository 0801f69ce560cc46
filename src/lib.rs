//! Voice-driven travel concierge: turns a spoken or typed trip request into
//! a day-wise itinerary, with optional speech playback of the plan.
//!
//! # Pipeline
//!
//! ```text
//! request ──▶ normalize ──▶ extract slots ──▶ generate ──▶ refine ──▶ plan
//!                                                                      │
//!                               speech format ◀── listen requested ◀───┘
//!                                    │
//!                                    ▼
//!                               synthesize ──▶ audio artifact
//! ```
//!
//! The extraction and refinement steps are degradable: extraction has a
//! pure-heuristic variant that needs no remote calls, and a failed
//! refinement silently falls back to the unrefined draft. Generation is the
//! single fatal step — without a plan there is nothing to answer with.
//!
//! [`pipeline::TripOrchestrator`] wires the components together;
//! [`config::AppConfig`] selects the extraction mode, models, and speech
//! behaviour.

pub mod config;
pub mod extract;
pub mod itinerary;
pub mod llm;
pub mod normalize;
pub mod pipeline;
pub mod speech;
