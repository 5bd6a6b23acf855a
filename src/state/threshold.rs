//! Threshold evaluation and phase-entry edge detection

use super::timer_state::{Phase, TimerState};
use crate::config::TimerConfig;

/// Edges detected by a single evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseEdges {
    pub warning_entered: bool,
    pub expired_entered: bool,
}

impl PhaseEdges {
    pub fn any(&self) -> bool {
        self.warning_entered || self.expired_entered
    }
}

/// Classify the current remaining time and latch any newly entered phase.
///
/// Edges are latched in the state's fired flags, so calling this repeatedly
/// for the same remaining time reports each edge at most once per reset cycle.
/// Warning uses a `<=` comparison so a jump past the threshold still fires.
pub fn evaluate(state: &mut TimerState, config: &TimerConfig) -> (Phase, PhaseEdges) {
    let phase = state.phase(config);
    let mut edges = PhaseEdges::default();

    match phase {
        Phase::Warning if !state.warning_already_fired => {
            state.warning_already_fired = true;
            edges.warning_entered = true;
        }
        Phase::Expired if !state.expired_signalled => {
            state.expired_signalled = true;
            edges.expired_entered = true;
        }
        _ => {}
    }

    (phase, edges)
}
