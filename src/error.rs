//! Error types for the countdown controller and the alert path

use thiserror::Error;

/// Errors surfaced by configuration and the command surface
#[derive(Debug, Error)]
pub enum CountdownError {
    /// Rejected at initialization so the timer never runs with nonsensical phases
    #[error("invalid duration: {reason} (total={total_seconds}s, warning={warning_seconds}s)")]
    InvalidDuration {
        total_seconds: u64,
        warning_seconds: u64,
        reason: &'static str,
    },

    #[error("timer state unavailable: {0}")]
    StateUnavailable(String),
}

/// Audio failures. Never surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    /// Primary cue could not be played (missing file, no output device)
    #[error("audio playback unavailable: {0}")]
    AudioPlaybackUnavailable(String),

    /// Fallback tone engine could not be initialized
    #[error("tone synthesis unavailable: {0}")]
    ToneSynthesisUnavailable(String),
}
