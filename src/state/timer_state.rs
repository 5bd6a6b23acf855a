//! Timer state structure and the values derived from it

use serde::{Deserialize, Serialize};

use crate::config::TimerConfig;

/// Phase of the countdown, always derived from the remaining seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Normal,
    Warning,
    Expired,
}

impl Phase {
    /// Classify remaining time against the warning threshold
    pub fn classify(remaining_seconds: u64, warning_threshold_seconds: u64) -> Self {
        if remaining_seconds == 0 {
            Phase::Expired
        } else if remaining_seconds <= warning_threshold_seconds {
            Phase::Warning
        } else {
            Phase::Normal
        }
    }
}

/// Operator-facing state of the command surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Never started since the last reset
    Idle,
    Running,
    Paused,
    /// Terminal until reset
    Expired,
}

impl RunState {
    /// Label of the combined start/pause control
    pub fn control_label(&self) -> &'static str {
        match self {
            RunState::Idle => "Start Timer",
            RunState::Running => "Pause",
            RunState::Paused => "Resume",
            RunState::Expired => "Closed",
        }
    }
}

/// Mutable countdown state owned by a single controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub run_state: RunState,
    /// Set on the first entry into Warning since the last reset
    pub warning_already_fired: bool,
    /// Set once the expired signal has been delivered
    pub expired_signalled: bool,
}

impl TimerState {
    /// Create the initial state for a configuration
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            remaining_seconds: config.total_duration_seconds(),
            run_state: RunState::Idle,
            warning_already_fired: false,
            expired_signalled: false,
        }
    }

    /// True only while the clock driver is ticking
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn phase(&self, config: &TimerConfig) -> Phase {
        Phase::classify(self.remaining_seconds, config.warning_threshold_seconds())
    }
}

/// Everything the presentation layer needs to render one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub remaining_seconds: u64,
    pub display: String,
    pub phase: Phase,
    pub run_state: RunState,
    pub is_running: bool,
    /// Warning indicator: shown once the warning edge fired, hidden outside Warning
    pub warning_active: bool,
    pub event_closed: bool,
    pub control_label: String,
}

impl TimerSnapshot {
    pub fn capture(state: &TimerState, config: &TimerConfig) -> Self {
        let phase = state.phase(config);
        Self {
            remaining_seconds: state.remaining_seconds,
            display: format_hms(state.remaining_seconds),
            phase,
            run_state: state.run_state,
            is_running: state.is_running(),
            warning_active: phase == Phase::Warning && state.warning_already_fired,
            event_closed: state.run_state == RunState::Expired,
            control_label: state.run_state.control_label().to_string(),
        }
    }
}

/// Notifications broadcast to interested listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    Started { remaining_seconds: u64 },
    Paused { remaining_seconds: u64 },
    Reset,
    WarningEntered { remaining_seconds: u64 },
    Expired,
}

/// Format seconds as zero-padded `HH:MM:SS`
pub fn format_hms(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}
