//! State management module
//!
//! This module contains the countdown state, its derived values and the
//! controller that owns them.

pub mod app_state;
pub mod countdown;
pub mod threshold;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use countdown::{Countdown, TickOutcome};
pub use threshold::PhaseEdges;
pub use timer_state::{format_hms, Phase, RunState, TimerEvent, TimerSnapshot, TimerState};
