//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! The API credential is the one value that may come from the environment
//! instead of disk: `TRIP_CONCIERGE_API_KEY` overrides `llm.api_key` at load
//! time so secrets never have to be written to `settings.toml`.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable that overrides `LlmConfig::api_key` when set.
pub const API_KEY_ENV: &str = "TRIP_CONCIERGE_API_KEY";

// ---------------------------------------------------------------------------
// ExtractionMode
// ---------------------------------------------------------------------------

/// Selects how travel slots are pulled out of the user's request.
///
/// | Variant       | Strategy                                  | Remote call |
/// |---------------|-------------------------------------------|-------------|
/// | Heuristic     | regex route/day matching + keyword intent | No          |
/// | ModelAssisted | labelled-line extraction via the LLM      | Yes         |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExtractionMode {
    /// Pure regex heuristics — no network, may silently default the day count.
    Heuristic,
    /// Delegate extraction to the main model; never defaults the day count.
    ModelAssisted,
}

impl Default for ExtractionMode {
    fn default() -> Self {
        Self::ModelAssisted
    }
}

// ---------------------------------------------------------------------------
// SpeechStyle
// ---------------------------------------------------------------------------

/// Selects how itinerary text is flattened for speech synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpeechStyle {
    /// Line-by-line rewrite: "Day N." headings, bullets become sentences.
    Structural,
    /// Strip markdown markers, collapse whitespace, hard-truncate.
    StripTruncate,
}

impl Default for SpeechStyle {
    fn default() -> Self {
        Self::Structural
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the remote chat-completions endpoint.
///
/// Two model identifiers are carried: `main_model` handles extraction and
/// itinerary generation, `refine_model` handles the optional reformatting
/// pass. Each is independently swappable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the API; `/v1/chat/completions` is appended per request.
    pub base_url: String,
    /// Bearer credential — `None` falls back to the `TRIP_CONCIERGE_API_KEY`
    /// environment variable.
    pub api_key: Option<String>,
    /// Model for slot extraction and itinerary generation.
    pub main_model: String,
    /// Model for the optional refinement pass (failure is non-fatal).
    pub refine_model: String,
    /// `HTTP-Referer` identification header value.
    pub referer: String,
    /// `X-Title` identification header value.
    pub app_title: String,
    /// Maximum seconds to wait for any LLM response before timing out.
    pub timeout_secs: u64,
    /// Token ceiling for the slot-extraction call.
    pub extract_max_tokens: u32,
    /// Token ceiling for the itinerary-generation call.
    pub generate_max_tokens: u32,
    /// Token ceiling for the refinement call (distinct from generation).
    pub refine_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api".into(),
            api_key: None,
            main_model: "deepseek/deepseek-chat".into(),
            refine_model: "gpt-4o".into(),
            referer: "http://localhost:8501".into(),
            app_title: "Voice Travel Concierge".into(),
            timeout_secs: 30,
            extract_max_tokens: 150,
            generate_max_tokens: 500,
            refine_max_tokens: 300,
        }
    }
}

impl LlmConfig {
    /// Resolve the effective API key: config value first, environment second.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// ExtractionConfig
// ---------------------------------------------------------------------------

/// Settings for the slot-extraction step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Which extraction strategy to run.
    pub mode: ExtractionMode,
    /// Day count assumed by the *heuristic* extractor when the text contains
    /// neither a digit nor a number word. `None` means "days not understood"
    /// is reported instead. The model-assisted extractor never defaults.
    pub default_days: Option<u32>,
    /// When `false`, a request with a resolved day count but no
    /// "from X to Y" route still produces a generic day-wise plan.
    pub require_route: bool,
    /// Run the best-effort multi-intent probe (flights/hotels/currency/…)
    /// after a plan is ready. Failure of the probe is silent.
    pub detect_kinds: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::default(),
            default_days: Some(3),
            require_route: true,
            detect_kinds: false,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for speech formatting and synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Hard character budget for speech-ready text (bounds synthesis cost).
    pub max_chars: usize,
    /// Formatting strategy applied before truncation.
    pub style: SpeechStyle,
    /// TTS endpoint base URL — `None` disables synthesis entirely.
    pub tts_base_url: Option<String>,
    /// TTS model identifier.
    pub tts_model: String,
    /// TTS voice identifier.
    pub tts_voice: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            max_chars: 800,
            style: SpeechStyle::default(),
            tts_base_url: None,
            tts_model: "tts-1".into(),
            tts_voice: "alloy".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

/// Settings for the voice-capture collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Seconds to wait for speech to start before giving up.
    pub timeout_secs: u64,
    /// Maximum seconds of a single captured phrase.
    pub phrase_time_limit_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            phrase_time_limit_secs: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use trip_concierge::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote language-model settings.
    pub llm: LlmConfig,
    /// Slot-extraction settings.
    pub extraction: ExtractionConfig,
    /// Speech formatting / synthesis settings.
    pub speech: SpeechConfig,
    /// Voice-capture settings.
    pub capture: CaptureConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        // LlmConfig
        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(original.llm.api_key, loaded.llm.api_key);
        assert_eq!(original.llm.main_model, loaded.llm.main_model);
        assert_eq!(original.llm.refine_model, loaded.llm.refine_model);
        assert_eq!(original.llm.timeout_secs, loaded.llm.timeout_secs);
        assert_eq!(original.llm.extract_max_tokens, loaded.llm.extract_max_tokens);
        assert_eq!(
            original.llm.generate_max_tokens,
            loaded.llm.generate_max_tokens
        );
        assert_eq!(original.llm.refine_max_tokens, loaded.llm.refine_max_tokens);

        // ExtractionConfig
        assert_eq!(original.extraction.mode, loaded.extraction.mode);
        assert_eq!(original.extraction.default_days, loaded.extraction.default_days);
        assert_eq!(original.extraction.require_route, loaded.extraction.require_route);

        // SpeechConfig
        assert_eq!(original.speech.max_chars, loaded.speech.max_chars);
        assert_eq!(original.speech.style, loaded.speech.style);
        assert_eq!(original.speech.tts_base_url, loaded.speech.tts_base_url);

        // CaptureConfig
        assert_eq!(original.capture.timeout_secs, loaded.capture.timeout_secs);
        assert_eq!(
            original.capture.phrase_time_limit_secs,
            loaded.capture.phrase_time_limit_secs
        );
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.llm.main_model, default.llm.main_model);
        assert_eq!(config.extraction.mode, default.extraction.mode);
        assert_eq!(config.speech.max_chars, default.speech.max_chars);
    }

    /// Verify default values match the design.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.llm.base_url, "https://openrouter.ai/api");
        assert_eq!(cfg.llm.main_model, "deepseek/deepseek-chat");
        assert_eq!(cfg.llm.refine_model, "gpt-4o");
        assert_eq!(cfg.llm.timeout_secs, 30);
        assert!(cfg.llm.api_key.is_none());
        assert_eq!(cfg.llm.generate_max_tokens, 500);
        assert_eq!(cfg.llm.refine_max_tokens, 300);

        assert_eq!(cfg.extraction.mode, ExtractionMode::ModelAssisted);
        assert_eq!(cfg.extraction.default_days, Some(3));
        assert!(cfg.extraction.require_route);
        assert!(!cfg.extraction.detect_kinds);

        assert_eq!(cfg.speech.max_chars, 800);
        assert_eq!(cfg.speech.style, SpeechStyle::Structural);
        assert!(cfg.speech.tts_base_url.is_none());

        assert_eq!(cfg.capture.timeout_secs, 5);
        assert_eq!(cfg.capture.phrase_time_limit_secs, 8);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.llm.base_url = "https://api.openai.com".into();
        cfg.llm.api_key = Some("sk-test".into());
        cfg.llm.main_model = "gpt-4o-mini".into();
        cfg.llm.timeout_secs = 60;
        cfg.extraction.mode = ExtractionMode::Heuristic;
        cfg.extraction.default_days = None;
        cfg.speech.max_chars = 700;
        cfg.speech.style = SpeechStyle::StripTruncate;
        cfg.speech.tts_base_url = Some("https://api.openai.com".into());

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.llm.base_url, "https://api.openai.com");
        assert_eq!(loaded.llm.api_key, Some("sk-test".into()));
        assert_eq!(loaded.llm.main_model, "gpt-4o-mini");
        assert_eq!(loaded.llm.timeout_secs, 60);
        assert_eq!(loaded.extraction.mode, ExtractionMode::Heuristic);
        assert_eq!(loaded.extraction.default_days, None);
        assert_eq!(loaded.speech.max_chars, 700);
        assert_eq!(loaded.speech.style, SpeechStyle::StripTruncate);
        assert_eq!(
            loaded.speech.tts_base_url,
            Some("https://api.openai.com".into())
        );
    }

    /// Config-held key wins over the environment variable.
    #[test]
    fn config_api_key_takes_priority() {
        let mut cfg = LlmConfig::default();
        cfg.api_key = Some("sk-from-config".into());
        assert_eq!(cfg.resolved_api_key().as_deref(), Some("sk-from-config"));
    }

    /// An empty config key is treated as unset.
    #[test]
    fn empty_api_key_is_unset() {
        let mut cfg = LlmConfig::default();
        cfg.api_key = Some(String::new());
        // With no env var set either, resolution yields None.
        if std::env::var(API_KEY_ENV).is_err() {
            assert_eq!(cfg.resolved_api_key(), None);
        }
    }
}
