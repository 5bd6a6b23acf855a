//! Terminal presentation of the countdown

use std::io::Write;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::state::{Phase, TimerSnapshot};

/// Render one snapshot as a single display line
pub fn render_line(snapshot: &TimerSnapshot) -> String {
    let mut line = format!("{}  [{}]", snapshot.display, snapshot.control_label);
    if snapshot.warning_active {
        line.push_str("  WARNING: event closing soon");
    }
    if snapshot.event_closed {
        line.push_str("  EVENT CLOSED");
    }
    line
}

/// Background task that prints every snapshot change to stdout
pub async fn display_task(mut rx: watch::Receiver<TimerSnapshot>) {
    debug!("Starting display task");

    let mut last_phase: Option<Phase> = None;
    loop {
        let snapshot = rx.borrow_and_update().clone();
        if last_phase != Some(snapshot.phase) {
            debug!("Display phase: {:?}", snapshot.phase);
            last_phase = Some(snapshot.phase);
        }

        {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}", render_line(&snapshot)) {
                warn!("Failed to write display line: {}", e);
            }
        }

        if rx.changed().await.is_err() {
            debug!("Timer channel closed, stopping display task");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::TimerConfig,
        state::{RunState, TimerState},
    };

    #[test]
    fn renders_time_and_control_label() {
        let config = TimerConfig::default();
        let snapshot = TimerSnapshot::capture(&TimerState::new(&config), &config);
        assert_eq!(render_line(&snapshot), "02:00:00  [Start Timer]");
    }

    #[test]
    fn renders_event_closed() {
        let config = TimerConfig::default();
        let mut state = TimerState::new(&config);
        state.remaining_seconds = 0;
        state.run_state = RunState::Expired;

        let line = render_line(&TimerSnapshot::capture(&state, &config));
        assert!(line.starts_with("00:00:00  [Closed]"));
        assert!(line.ends_with("EVENT CLOSED"));
    }
}
