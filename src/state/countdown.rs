//! Countdown state machine
//!
//! Synchronous core driven by the controller: command
//! transitions (`Idle → Running ⇄ Paused → Expired`, reset from anywhere)
//! and the per-tick decrement feeding the threshold evaluator. Scheduling
//! of ticks lives in [`crate::tasks::clock`].

use super::{
    threshold::{evaluate, PhaseEdges},
    timer_state::{Phase, RunState, TimerSnapshot, TimerState},
};
use crate::config::TimerConfig;

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub remaining_seconds: u64,
    pub phase: Phase,
    pub edges: PhaseEdges,
    /// The clock driver must stop ticking
    pub stopped: bool,
}

/// Countdown timer with fixed configuration
#[derive(Debug, Clone)]
pub struct Countdown {
    config: TimerConfig,
    state: TimerState,
}

impl Countdown {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            state: TimerState::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase(&self.config)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::capture(&self.state, &self.config)
    }

    /// `Idle|Paused → Running`. Returns false when nothing changed.
    pub fn start(&mut self) -> bool {
        match self.state.run_state {
            RunState::Idle | RunState::Paused => {
                self.state.run_state = RunState::Running;
                true
            }
            RunState::Running | RunState::Expired => false,
        }
    }

    /// `Running → Paused`. Returns false when nothing changed.
    pub fn pause(&mut self) -> bool {
        if self.state.run_state != RunState::Running {
            return false;
        }
        self.state.run_state = RunState::Paused;
        true
    }

    /// Restore the initial state, clearing both edge detectors
    pub fn reset(&mut self) {
        self.state = TimerState::new(&self.config);
    }

    /// Advance by one period. Ticks outside `Running` are ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome {
                remaining_seconds: self.state.remaining_seconds,
                phase: self.phase(),
                edges: PhaseEdges::default(),
                stopped: self.state.run_state == RunState::Expired,
            };
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        let (phase, edges) = evaluate(&mut self.state, &self.config);

        let stopped = phase == Phase::Expired;
        if stopped {
            self.state.run_state = RunState::Expired;
        }

        TickOutcome {
            remaining_seconds: self.state.remaining_seconds,
            phase,
            edges,
            stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_countdown() -> Countdown {
        Countdown::new(TimerConfig::new(7200, 1800).expect("config"))
    }

    #[test]
    fn starts_idle_with_full_duration() {
        let countdown = event_countdown();
        assert_eq!(countdown.state().remaining_seconds, 7200);
        assert_eq!(countdown.state().run_state, RunState::Idle);
        assert!(!countdown.state().is_running());
        assert_eq!(countdown.phase(), Phase::Normal);
    }

    #[test]
    fn ticks_are_ignored_unless_running() {
        let mut countdown = event_countdown();
        let outcome = countdown.tick();
        assert_eq!(outcome.remaining_seconds, 7200);
        assert!(!outcome.stopped);

        countdown.start();
        countdown.tick();
        countdown.pause();
        countdown.tick();
        assert_eq!(countdown.state().remaining_seconds, 7199);
    }

    #[test]
    fn start_is_idempotent() {
        let mut countdown = event_countdown();
        assert!(countdown.start());
        assert!(!countdown.start());
        assert_eq!(countdown.state().run_state, RunState::Running);
    }

    #[test]
    fn pause_is_idempotent_and_only_leaves_running() {
        let mut countdown = event_countdown();
        assert!(!countdown.pause());
        assert_eq!(countdown.state().run_state, RunState::Idle);

        countdown.start();
        assert!(countdown.pause());
        assert!(!countdown.pause());
        assert_eq!(countdown.state().run_state, RunState::Paused);

        assert!(countdown.start());
        assert_eq!(countdown.state().run_state, RunState::Running);
    }

    #[test]
    fn full_countdown_scenario() {
        let mut countdown = event_countdown();
        countdown.start();

        let mut warnings = 0;
        let mut expirations = 0;
        for _ in 0..5401 {
            let outcome = countdown.tick();
            warnings += outcome.edges.warning_entered as u32;
            expirations += outcome.edges.expired_entered as u32;
        }
        assert_eq!(countdown.state().remaining_seconds, 1799);
        assert_eq!(countdown.phase(), Phase::Warning);
        assert_eq!(warnings, 1);
        assert!(countdown.state().warning_already_fired);

        let mut last = None;
        for _ in 5401..7200 {
            let outcome = countdown.tick();
            warnings += outcome.edges.warning_entered as u32;
            expirations += outcome.edges.expired_entered as u32;
            last = Some(outcome);
        }
        let last = last.expect("ticked");
        assert!(last.stopped);
        assert_eq!(countdown.state().remaining_seconds, 0);
        assert_eq!(countdown.phase(), Phase::Expired);
        assert_eq!(countdown.state().run_state, RunState::Expired);
        assert_eq!(warnings, 1);
        assert_eq!(expirations, 1);
    }

    #[test]
    fn warning_edge_fires_on_the_threshold_tick() {
        let mut countdown = Countdown::new(TimerConfig::new(5, 2).expect("config"));
        countdown.start();

        let edges: Vec<bool> = (0..4).map(|_| countdown.tick().edges.warning_entered).collect();
        // remaining: 4, 3, 2, 1
        assert_eq!(edges, vec![false, false, true, false]);
    }

    #[test]
    fn expired_is_terminal_until_reset() {
        let mut countdown = Countdown::new(TimerConfig::new(2, 1).expect("config"));
        countdown.start();
        countdown.tick();
        assert!(countdown.tick().stopped);

        assert!(!countdown.start());
        assert!(!countdown.pause());
        let outcome = countdown.tick();
        assert!(!outcome.edges.any());
        assert_eq!(outcome.remaining_seconds, 0);

        countdown.reset();
        assert_eq!(countdown.state().run_state, RunState::Idle);
        assert!(countdown.start());
    }

    #[test]
    fn reset_restores_exact_initial_state() {
        let config = TimerConfig::new(100, 50).expect("config");
        let mut countdown = Countdown::new(config);
        countdown.start();
        for _ in 0..60 {
            countdown.tick();
        }
        assert!(countdown.state().warning_already_fired);

        countdown.reset();
        assert_eq!(countdown.state(), &TimerState::new(&config));
        assert_eq!(countdown.state().remaining_seconds, 100);
        assert_eq!(countdown.phase(), Phase::Normal);
        assert!(!countdown.state().warning_already_fired);
        assert!(!countdown.snapshot().warning_active);
    }

    #[test]
    fn warning_fires_again_after_reset() {
        let mut countdown = Countdown::new(TimerConfig::new(3, 1).expect("config"));
        let mut warnings = 0;
        for _ in 0..2 {
            countdown.start();
            for _ in 0..3 {
                warnings += countdown.tick().edges.warning_entered as u32;
            }
            countdown.reset();
        }
        assert_eq!(warnings, 2);
    }
}
