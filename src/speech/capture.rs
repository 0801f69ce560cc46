//! Voice-capture collaborator seam.
//!
//! Microphone mechanics live outside this crate; the pipeline only depends
//! on the [`SpeechCapture`] trait. Implementations listen for a bounded
//! duration and return normalized lowercase text, or one of three failure
//! reasons. Capture failures are always recovered locally — the user is
//! asked to retry, nothing crashes.

use thiserror::Error;

use crate::config::CaptureConfig;

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Why a capture attempt produced no text.
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    /// No speech started within the listen timeout.
    #[error("no speech detected")]
    Timeout,

    /// Audio was captured but could not be recognised.
    #[error("could not understand the audio")]
    Unrecognized,

    /// The capture backend itself failed (device, transport, API).
    #[error("speech capture unavailable: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// SpeechCapture trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for voice input.
///
/// # Contract
///
/// - Blocking call, bounded by the listen timeout and phrase time limit the
///   implementation was configured with (see [`CaptureConfig`]).
/// - Success returns lowercase text; implementations must not panic.
pub trait SpeechCapture: Send + Sync {
    /// Listen once and return the recognised text.
    fn listen(&self) -> Result<String, CaptureError>;
}

// Compile-time assertion: Box<dyn SpeechCapture> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechCapture>) {}
};

// ---------------------------------------------------------------------------
// UnavailableCapture
// ---------------------------------------------------------------------------

/// Stand-in used when no capture backend is wired up. Always reports a
/// transport failure so the rest of the pipeline stays exercisable from
/// typed input alone.
pub struct UnavailableCapture {
    reason: String,
}

impl UnavailableCapture {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Default stand-in built from config (reason mentions the configured
    /// listen window for the eventual log line).
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(format!(
            "no capture backend configured (listen window {}s/{}s)",
            config.timeout_secs, config.phrase_time_limit_secs
        ))
    }
}

impl SpeechCapture for UnavailableCapture {
    fn listen(&self) -> Result<String, CaptureError> {
        Err(CaptureError::Transport(self.reason.clone()))
    }
}

// ---------------------------------------------------------------------------
// MockCapture  (test double)
// ---------------------------------------------------------------------------

/// Test double returning a fixed outcome.
#[cfg(test)]
pub struct MockCapture(pub Result<String, CaptureError>);

#[cfg(test)]
impl MockCapture {
    pub fn ok(text: &str) -> Self {
        Self(Ok(text.to_string()))
    }

    pub fn failing(error: CaptureError) -> Self {
        Self(Err(error))
    }
}

#[cfg(test)]
impl SpeechCapture for MockCapture {
    fn listen(&self) -> Result<String, CaptureError> {
        self.0.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_capture_reports_transport() {
        let capture = UnavailableCapture::from_config(&CaptureConfig::default());
        let err = capture.listen().unwrap_err();
        assert!(matches!(err, CaptureError::Transport(_)));
        assert!(err.to_string().contains("speech capture unavailable"));
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(CaptureError::Timeout.to_string(), "no speech detected");
        assert_eq!(
            CaptureError::Unrecognized.to_string(),
            "could not understand the audio"
        );
    }

    #[test]
    fn mock_capture_round_trips() {
        assert_eq!(MockCapture::ok("hello").listen().unwrap(), "hello");
        assert!(MockCapture::failing(CaptureError::Timeout).listen().is_err());
    }
}
