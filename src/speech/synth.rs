//! Speech-synthesis collaborator seam.
//!
//! [`HttpSynthesizer`] posts speech-ready text to an OpenAI-compatible
//! `/v1/audio/speech` endpoint and writes the returned MP3 bytes to a
//! temporary file. Artifacts are cached by exact input text and owned by the
//! synthesizer — dropping it removes every file, and a failed request never
//! leaves a half-written artifact referenced (the temp file only enters the
//! cache after a fully successful write).
//!
//! Synthesis is blocking and potentially slow; the orchestrator runs it via
//! `tokio::task::spawn_blocking`.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempPath;
use thiserror::Error;

use crate::config::SpeechConfig;

// ---------------------------------------------------------------------------
// SynthError
// ---------------------------------------------------------------------------

/// Errors from the synthesis step. All recovered locally by the caller —
/// playback becomes unavailable, nothing else happens.
#[derive(Debug, Error)]
pub enum SynthError {
    /// No TTS endpoint is configured.
    #[error("speech synthesis is not configured")]
    Disabled,

    /// HTTP transport error or timeout.
    #[error("TTS request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status code.
    #[error("TTS error {code}")]
    Status { code: u16 },

    /// Writing the audio artifact failed.
    #[error("failed to write audio artifact: {0}")]
    Io(String),
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for text-to-speech backends.
///
/// The returned path stays valid for the lifetime of the synthesizer; the
/// implementation owns cleanup.
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and return the path of the audio artifact.
    fn synthesize(&self, text: &str) -> Result<PathBuf, SynthError>;
}

// Compile-time assertion: Box<dyn SpeechSynthesizer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechSynthesizer>) {}
};

// ---------------------------------------------------------------------------
// HttpSynthesizer
// ---------------------------------------------------------------------------

/// TTS backend speaking the OpenAI audio/speech wire format.
pub struct HttpSynthesizer {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    voice: String,
    cache_dir: PathBuf,
    /// Exact-text cache; `TempPath` removes the file on drop.
    cache: Mutex<HashMap<String, TempPath>>,
}

impl HttpSynthesizer {
    /// Build a synthesizer from speech settings.
    ///
    /// Returns `Err(SynthError::Disabled)` when no TTS base URL is
    /// configured, so the caller can install a stub instead.
    pub fn from_config(
        config: &SpeechConfig,
        api_key: Option<String>,
        timeout_secs: u64,
        cache_dir: &Path,
    ) -> Result<Self, SynthError> {
        let base_url = config.tts_base_url.clone().ok_or(SynthError::Disabled)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SynthError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model: config.tts_model.clone(),
            voice: config.tts_voice.clone(),
            cache_dir: cache_dir.to_path_buf(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/audio/speech", self.base_url.trim_end_matches('/'))
    }

    fn fetch_audio(&self, text: &str) -> Result<Vec<u8>, SynthError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": self.voice,
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            req = req.bearer_auth(key);
        }

        let response = req.send().map_err(|e| SynthError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthError::Status {
                code: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| SynthError::Request(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn write_artifact(&self, bytes: &[u8]) -> Result<TempPath, SynthError> {
        std::fs::create_dir_all(&self.cache_dir).map_err(|e| SynthError::Io(e.to_string()))?;

        let mut file = tempfile::Builder::new()
            .prefix("itinerary-")
            .suffix(".mp3")
            .tempfile_in(&self.cache_dir)
            .map_err(|e| SynthError::Io(e.to_string()))?;

        file.write_all(bytes)
            .map_err(|e| SynthError::Io(e.to_string()))?;
        file.flush().map_err(|e| SynthError::Io(e.to_string()))?;

        Ok(file.into_temp_path())
    }
}

impl SpeechSynthesizer for HttpSynthesizer {
    fn synthesize(&self, text: &str) -> Result<PathBuf, SynthError> {
        if let Some(path) = self.cache.lock().unwrap().get(text) {
            return Ok(path.to_path_buf());
        }

        let bytes = self.fetch_audio(text)?;
        let temp_path = self.write_artifact(&bytes)?;
        let path = temp_path.to_path_buf();

        self.cache
            .lock()
            .unwrap()
            .insert(text.to_string(), temp_path);

        log::debug!("synthesised {} bytes → {}", bytes.len(), path.display());
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// UnavailableSynthesizer
// ---------------------------------------------------------------------------

/// Stand-in used when synthesis is not configured; always reports
/// [`SynthError::Disabled`] so playback is simply unavailable.
pub struct UnavailableSynthesizer;

impl SpeechSynthesizer for UnavailableSynthesizer {
    fn synthesize(&self, _text: &str) -> Result<PathBuf, SynthError> {
        Err(SynthError::Disabled)
    }
}

// ---------------------------------------------------------------------------
// MockSynthesizer  (test double)
// ---------------------------------------------------------------------------

/// Test double that records inputs and returns a fixed path or error.
#[cfg(test)]
pub struct MockSynthesizer {
    path: Option<PathBuf>,
    pub inputs: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockSynthesizer {
    pub fn ok(path: &str) -> Self {
        Self {
            path: Some(PathBuf::from(path)),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            path: None,
            inputs: Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl SpeechSynthesizer for MockSynthesizer {
    fn synthesize(&self, text: &str) -> Result<PathBuf, SynthError> {
        self.inputs.lock().unwrap().push(text.to_string());
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Err(SynthError::Request("mock failure".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_without_base_url_is_disabled() {
        let config = SpeechConfig::default();
        assert!(config.tts_base_url.is_none());

        let result = HttpSynthesizer::from_config(&config, None, 30, Path::new("/tmp"));
        assert!(matches!(result, Err(SynthError::Disabled)));
    }

    #[test]
    fn from_config_with_base_url_builds() {
        let mut config = SpeechConfig::default();
        config.tts_base_url = Some("https://api.openai.com".into());

        let synth =
            HttpSynthesizer::from_config(&config, Some("sk-test".into()), 30, Path::new("/tmp"))
                .expect("should build");
        assert_eq!(synth.endpoint(), "https://api.openai.com/v1/audio/speech");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let mut config = SpeechConfig::default();
        config.tts_base_url = Some("https://api.openai.com/".into());

        let synth = HttpSynthesizer::from_config(&config, None, 30, Path::new("/tmp")).unwrap();
        assert_eq!(synth.endpoint(), "https://api.openai.com/v1/audio/speech");
    }

    #[test]
    fn artifacts_are_removed_when_synthesizer_drops() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SpeechConfig::default();
        config.tts_base_url = Some("http://localhost:9".into());

        let synth = HttpSynthesizer::from_config(&config, None, 1, dir.path()).unwrap();

        // Write an artifact through the internal path (no network involved).
        let temp_path = synth.write_artifact(b"mp3-bytes").unwrap();
        let path = temp_path.to_path_buf();
        synth.cache.lock().unwrap().insert("text".into(), temp_path);
        assert!(path.exists());

        drop(synth);
        assert!(!path.exists(), "artifact should be cleaned up on drop");
    }

    #[test]
    fn unavailable_synthesizer_is_disabled() {
        let err = UnavailableSynthesizer.synthesize("hello").unwrap_err();
        assert!(matches!(err, SynthError::Disabled));
    }

    #[test]
    fn mock_synthesizer_records_inputs() {
        let synth = MockSynthesizer::ok("/tmp/a.mp3");
        synth.synthesize("one").unwrap();
        synth.synthesize("two").unwrap();
        assert_eq!(*synth.inputs.lock().unwrap(), vec!["one", "two"]);
    }
}
