//! The orchestrator — wires normalisation, extraction, generation,
//! refinement and speech into complete turns.
//!
//! One turn: normalise → extract slots → generate → refine → store plan.
//! Extraction and generation failures abort the turn and return the state
//! machine to `AwaitingInput`; refinement never fails (it falls back to the
//! draft); synthesis and capture failures are recovered without aborting
//! anything. Remote calls within a turn are strictly sequential — nothing
//! here fans out.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, ExtractionMode};
use crate::extract::{
    ExtractError, HeuristicExtractor, KindProbe, ModelExtractor, RequestKind, SlotExtractor,
    TravelSlots,
};
use crate::itinerary::{Itinerary, ItineraryDraft, ItineraryGenerator, ItineraryRefiner};
use crate::llm::{ChatClient, LlmError};
use crate::normalize::TextNormalizer;
use crate::pipeline::state::{SessionState, TurnPhase};
use crate::speech::{SpeechCapture, SpeechFormatter, SpeechSynthesizer};

// ---------------------------------------------------------------------------
// TurnError
// ---------------------------------------------------------------------------

/// Failures that abort a turn. Recovered failures (refinement, synthesis,
/// capture) never surface here.
#[derive(Debug, Error)]
pub enum TurnError {
    /// Slot extraction failed or the request was too incomplete to plan.
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// The itinerary-generation remote call failed.
    #[error(transparent)]
    Generation(#[from] LlmError),
}

// ---------------------------------------------------------------------------
// TripOrchestrator
// ---------------------------------------------------------------------------

/// Owns the session and drives the turn pipeline.
///
/// All mutable state lives in the embedded [`SessionState`]; the components
/// themselves are stateless between turns.
pub struct TripOrchestrator {
    normalizer: TextNormalizer,
    extractor: Box<dyn SlotExtractor>,
    generator: ItineraryGenerator,
    refiner: ItineraryRefiner,
    formatter: SpeechFormatter,
    capture: Arc<dyn SpeechCapture>,
    synth: Arc<dyn SpeechSynthesizer>,
    kind_probe: Option<KindProbe>,
    require_route: bool,
    session: SessionState,
}

impl TripOrchestrator {
    /// Wire up the pipeline from configuration. The extractor variant
    /// follows `config.extraction.mode`; the kind probe only exists when
    /// `detect_kinds` is on.
    pub fn new(
        config: &AppConfig,
        client: Arc<dyn ChatClient>,
        capture: Arc<dyn SpeechCapture>,
        synth: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let extractor: Box<dyn SlotExtractor> = match config.extraction.mode {
            ExtractionMode::Heuristic => {
                Box::new(HeuristicExtractor::new(config.extraction.default_days))
            }
            ExtractionMode::ModelAssisted => {
                Box::new(ModelExtractor::new(Arc::clone(&client), &config.llm))
            }
        };

        let kind_probe = config.extraction.detect_kinds.then(|| {
            KindProbe::new(
                Arc::clone(&client),
                &config.llm.main_model,
                config.llm.extract_max_tokens,
            )
        });

        Self {
            normalizer: TextNormalizer::new(),
            extractor,
            generator: ItineraryGenerator::new(Arc::clone(&client), &config.llm),
            refiner: ItineraryRefiner::new(client, &config.llm),
            formatter: SpeechFormatter::from_config(&config.speech),
            capture,
            synth,
            kind_probe,
            require_route: config.extraction.require_route,
            session: SessionState::new(),
        }
    }

    /// Read access to the session for the front-end.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> TurnPhase {
        self.session.phase
    }

    // -- turns --------------------------------------------------------------

    /// Run one complete text turn: normalise, extract, generate, refine.
    /// Returns the reply text; the plan is also stored on the session.
    pub async fn handle_turn(&mut self, raw: &str) -> Result<String, TurnError> {
        let request = self.normalizer.request(raw);
        log::info!("turn started: {:?}", request.normalized);

        self.session.phase = TurnPhase::Extracting;
        self.session.push_user(request.raw.clone());

        let slots = match self.extractor.extract(&request.normalized).await {
            Ok(slots) => slots,
            Err(err) => return Err(self.abort_turn(err.into())),
        };

        self.session.phase = TurnPhase::Generating;
        let draft = match self.generate(&slots).await {
            Ok(draft) => draft,
            Err(err) => return Err(self.abort_turn(err)),
        };

        self.session.phase = TurnPhase::Refining;
        let refined = self.refiner.refine(&draft.body).await;
        let plan = Itinerary::from_draft(draft, refined);
        log::info!(
            "turn complete: {}-day plan, refined: {}",
            plan.day_count,
            plan.refined
        );

        let mut reply = plan.body.clone();
        if let Some(notice) = self.unsupported_kinds_notice(&request.normalized).await {
            reply.push_str(&notice);
        }

        self.session.last_plan = Some(plan);
        self.session.last_audio = None;
        self.session.last_error = None;
        self.session.push_assistant(reply.clone());
        self.session.phase = TurnPhase::Ready;

        Ok(reply)
    }

    /// Run one voice turn: capture speech on the blocking pool, then feed
    /// the transcript through [`handle_turn`](Self::handle_turn). A capture
    /// failure is recovered — the session returns to `AwaitingInput` with a
    /// retry message and `Ok(None)`.
    pub async fn voice_turn(&mut self) -> Result<Option<String>, TurnError> {
        self.session.phase = TurnPhase::Extracting;

        let capture = Arc::clone(&self.capture);
        let heard = tokio::task::spawn_blocking(move || capture.listen()).await;

        match heard {
            Ok(Ok(text)) => self.handle_turn(&text).await.map(Some),
            Ok(Err(err)) => {
                log::warn!("speech capture failed: {err}");
                self.session.last_error = Some(format!("{err}, please try again"));
                self.session.phase = TurnPhase::AwaitingInput;
                Ok(None)
            }
            Err(err) => {
                log::warn!("capture task failed: {err}");
                self.session.last_error = Some("speech capture failed, please try again".into());
                self.session.phase = TurnPhase::AwaitingInput;
                Ok(None)
            }
        }
    }

    /// Format the current plan for speech and synthesize it on the blocking
    /// pool. Success yields the audio path and moves to `PlaybackReady`;
    /// any failure logs a warning and drops back to `Ready` with no audio.
    /// Returns `None` when there is no plan to speak.
    pub async fn speak_last_plan(&mut self) -> Option<PathBuf> {
        let plan = self.session.last_plan.as_ref()?;
        let speech = self.formatter.to_speech(&plan.body);

        self.session.phase = TurnPhase::Synthesizing;
        let synth = Arc::clone(&self.synth);
        let result = tokio::task::spawn_blocking(move || synth.synthesize(&speech)).await;

        match result {
            Ok(Ok(path)) => {
                self.session.last_audio = Some(path.clone());
                self.session.phase = TurnPhase::PlaybackReady;
                Some(path)
            }
            Ok(Err(err)) => {
                log::warn!("speech synthesis failed, playback unavailable: {err}");
                self.session.last_error = Some("playback unavailable".into());
                self.session.phase = TurnPhase::Ready;
                None
            }
            Err(err) => {
                log::warn!("synthesis task failed: {err}");
                self.session.last_error = Some("playback unavailable".into());
                self.session.phase = TurnPhase::Ready;
                None
            }
        }
    }

    /// Clear the session completely. Safe in any phase; repeat calls are
    /// no-ops.
    pub fn reset(&mut self) {
        self.session.reset();
        log::info!("session reset");
    }

    // -- internals ----------------------------------------------------------

    async fn generate(&self, slots: &TravelSlots) -> Result<ItineraryDraft, TurnError> {
        // Extractors guarantee days is set when they return Ok.
        let days = slots.days.ok_or(ExtractError::DaysUnresolved)?;

        match (&slots.source, &slots.destination) {
            (Some(source), Some(destination)) => Ok(self
                .generator
                .generate(source, destination, days, slots.intent)
                .await?),
            _ if !self.require_route => {
                Ok(self.generator.generate_days_only(days, slots.intent).await?)
            }
            _ => Err(ExtractError::MissingSlots.into()),
        }
    }

    /// Non-fatal probe for request kinds beyond itinerary planning. Any
    /// unsupported kind gets a short notice appended to the reply.
    async fn unsupported_kinds_notice(&self, text: &str) -> Option<String> {
        let probe = self.kind_probe.as_ref()?;
        let extras: Vec<&str> = probe
            .detect(text)
            .await
            .into_iter()
            .filter(|kind| *kind != RequestKind::Itinerary)
            .map(|kind| kind.label())
            .collect();

        if extras.is_empty() {
            None
        } else {
            Some(format!(
                "\n\nNote: {} requests are not supported yet.",
                extras.join(", ")
            ))
        }
    }

    fn abort_turn(&mut self, err: TurnError) -> TurnError {
        log::error!("turn aborted: {err}");
        self.session.last_error = Some(err.to_string());
        self.session.phase = TurnPhase::AwaitingInput;
        err
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
