//! Application entry point — Trip Concierge CLI.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the chat client ([`ApiClient`]) from config.
//! 5. Build speech synthesis if a TTS endpoint is configured; otherwise use
//!    the unavailable stub so the text pipeline still works.
//! 6. Wire the [`TripOrchestrator`] and run the REPL — blocks the main
//!    thread until `:quit`.
//!
//! # REPL commands
//!
//! Any plain line is treated as a travel request. Commands start with `:`:
//! `:voice` captures a spoken request, `:listen` speaks the current plan,
//! `:reset` clears the session, `:quit` exits.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use trip_concierge::{
    config::{AppConfig, AppPaths},
    llm::{ApiClient, ChatClient},
    pipeline::TripOrchestrator,
    speech::{
        HttpSynthesizer, SpeechCapture, SpeechSynthesizer, SynthError, UnavailableCapture,
        UnavailableSynthesizer,
    },
};

// ---------------------------------------------------------------------------
// REPL
// ---------------------------------------------------------------------------

async fn run_repl(mut orchestrator: TripOrchestrator) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Trip Concierge — describe a trip (e.g. \"3 days from Delhi to Paris\").");
    println!("Commands: :voice  :listen  :reset  :quit");

    loop {
        write!(stdout, "> ").context("failed to write prompt")?;
        stdout.flush().context("failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("stdin read failed")? == 0 {
            break; // EOF
        }
        let line = line.trim();

        match line {
            "" => continue,
            ":quit" | ":q" => break,

            ":reset" => {
                orchestrator.reset();
                println!("Session cleared.");
            }

            ":voice" => match orchestrator.voice_turn().await {
                Ok(Some(reply)) => println!("\n{reply}\n"),
                Ok(None) => {
                    if let Some(message) = &orchestrator.session().last_error {
                        println!("{message}");
                    }
                }
                Err(err) => println!("Sorry, that didn't work: {err}"),
            },

            ":listen" => match orchestrator.speak_last_plan().await {
                Some(path) => println!("Audio ready: {}", path.display()),
                None => {
                    if orchestrator.session().last_plan.is_none() {
                        println!("Nothing to speak yet — plan a trip first.");
                    } else {
                        println!("Playback unavailable.");
                    }
                }
            },

            request => match orchestrator.handle_turn(request).await {
                Ok(reply) => println!("\n{reply}\n"),
                Err(err) => println!("Sorry, that didn't work: {err}"),
            },
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Trip Concierge starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    if config.llm.resolved_api_key().is_none() {
        log::warn!("No API key configured; remote calls will likely be rejected");
    }

    // 3. Tokio runtime (2 workers — a turn plus one blocking speech task)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Chat client
    let client: Arc<dyn ChatClient> = Arc::new(ApiClient::from_config(&config.llm));

    // 5. Speech synthesis (may be unconfigured — degrade gracefully).
    //    The blocking HTTP client must be built outside the async runtime.
    let paths = AppPaths::new();
    if let Err(e) = std::fs::create_dir_all(&paths.audio_cache_dir) {
        log::warn!(
            "Could not create audio cache dir {}: {e}",
            paths.audio_cache_dir.display()
        );
    }

    let synth: Arc<dyn SpeechSynthesizer> = match HttpSynthesizer::from_config(
        &config.speech,
        config.llm.resolved_api_key(),
        config.llm.timeout_secs,
        &paths.audio_cache_dir,
    ) {
        Ok(synth) => {
            log::info!("Speech synthesis enabled");
            Arc::new(synth)
        }
        Err(SynthError::Disabled) => {
            log::info!("No TTS endpoint configured; playback disabled");
            Arc::new(UnavailableSynthesizer)
        }
        Err(e) => {
            log::warn!("Speech synthesis unavailable: {e}");
            Arc::new(UnavailableSynthesizer)
        }
    };

    // No microphone backend is wired in yet; the stub keeps :voice usable
    // as a command with a clear error instead of a crash.
    let capture: Arc<dyn SpeechCapture> = Arc::new(UnavailableCapture::from_config(&config.capture));

    // 6. Orchestrator + REPL
    let orchestrator = TripOrchestrator::new(&config, client, capture, synth);
    rt.block_on(run_repl(orchestrator))
}
