//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\trip-concierge\
//!   macOS:   ~/Library/Application Support/trip-concierge/
//!   Linux:   ~/.config/trip-concierge/
//!
//! Cache dir (synthesised audio artifacts):
//!   Windows: %LOCALAPPDATA%\trip-concierge\
//!   macOS:   ~/Library/Caches/trip-concierge/
//!   Linux:   ~/.cache/trip-concierge/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for temporary synthesised audio files.
    pub audio_cache_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "trip-concierge";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let audio_cache_dir = cache_dir.join("audio");

        Self {
            config_dir,
            settings_file,
            audio_cache_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths
            .audio_cache_dir
            .file_name()
            .is_some_and(|n| n == "audio"));
    }
}
