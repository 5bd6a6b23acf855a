//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::error::CountdownError;

/// Default countdown length: two hours
pub const DEFAULT_DURATION_SECONDS: u64 = 2 * 60 * 60;

/// Default warning threshold: thirty minutes before the end
pub const DEFAULT_WARNING_SECONDS: u64 = 30 * 60;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "event-countdown")]
#[command(about = "An event countdown timer with an audible warning and an event-closed state")]
#[command(version)]
pub struct Config {
    /// Total countdown duration in seconds
    #[arg(short, long, default_value_t = DEFAULT_DURATION_SECONDS)]
    pub duration: u64,

    /// Remaining seconds at which the warning phase begins
    #[arg(short, long, default_value_t = DEFAULT_WARNING_SECONDS)]
    pub warning: u64,

    /// Do not start counting down at launch
    #[arg(long)]
    pub no_auto_start: bool,

    /// Start counting again immediately after a reset
    #[arg(long)]
    pub rearm_on_reset: bool,

    /// Audio file played when the warning phase is entered
    #[arg(long, default_value = "warning.mp3")]
    pub cue: PathBuf,

    /// Port for the local control surface
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address for the local control surface
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Build the validated timer configuration
    pub fn timer_config(&self) -> Result<TimerConfig, CountdownError> {
        Ok(TimerConfig::new(self.duration, self.warning)?
            .with_auto_start(!self.no_auto_start)
            .with_rearm_on_reset(self.rearm_on_reset))
    }
}

/// Timer constants fixed at initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    total_duration_seconds: u64,
    warning_threshold_seconds: u64,
    auto_start: bool,
    rearm_on_reset: bool,
}

impl TimerConfig {
    /// Validate durations. The warning threshold must be strictly below the total.
    pub fn new(total_duration_seconds: u64, warning_threshold_seconds: u64) -> Result<Self, CountdownError> {
        if total_duration_seconds == 0 {
            return Err(CountdownError::InvalidDuration {
                total_seconds: total_duration_seconds,
                warning_seconds: warning_threshold_seconds,
                reason: "total duration must be positive",
            });
        }
        if warning_threshold_seconds >= total_duration_seconds {
            return Err(CountdownError::InvalidDuration {
                total_seconds: total_duration_seconds,
                warning_seconds: warning_threshold_seconds,
                reason: "warning threshold must be below the total duration",
            });
        }

        Ok(Self {
            total_duration_seconds,
            warning_threshold_seconds,
            auto_start: false,
            rearm_on_reset: false,
        })
    }

    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    pub fn with_rearm_on_reset(mut self, rearm_on_reset: bool) -> Self {
        self.rearm_on_reset = rearm_on_reset;
        self
    }

    pub fn total_duration_seconds(&self) -> u64 {
        self.total_duration_seconds
    }

    pub fn warning_threshold_seconds(&self) -> u64 {
        self.warning_threshold_seconds
    }

    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    pub fn rearm_on_reset(&self) -> bool {
        self.rearm_on_reset
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            total_duration_seconds: DEFAULT_DURATION_SECONDS,
            warning_threshold_seconds: DEFAULT_WARNING_SECONDS,
            auto_start: true,
            rearm_on_reset: false,
        }
    }
}
