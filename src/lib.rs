//! Event Countdown - a countdown timer with an audible warning
//!
//! This library provides the countdown controller: a running/paused/expired
//! state machine driven by a one-second clock, a threshold evaluator that
//! detects entry into the warning and expired phases, and an alert path
//! that plays a warning cue or falls back to a synthesized tone.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, TimerConfig};
pub use error::{AlertError, CountdownError};
pub use state::{AppState, Phase, RunState, TimerEvent, TimerSnapshot};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
