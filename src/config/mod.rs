//! Configuration module for the travel concierge.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for cross-platform data directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, CaptureConfig, ExtractionConfig, ExtractionMode, LlmConfig, SpeechConfig,
    SpeechStyle, API_KEY_ENV,
};
