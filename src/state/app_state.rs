//! Countdown controller shared by the clock task and the operator surface

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use super::{Countdown, TimerEvent, TimerSnapshot, TimerState};
use crate::{
    config::TimerConfig,
    error::CountdownError,
    services::{AlertRequest, AlertSender},
    tasks::clock::{spawn_clock, TickHandle},
};

/// Countdown plus the tick task currently driving it
#[derive(Debug)]
struct Inner {
    countdown: Countdown,
    /// Bumped whenever ticking is halted; ticks from older generations are dropped
    generation: u64,
    ticker: Option<TickHandle>,
}

impl Inner {
    fn halt_clock(&mut self) {
        self.generation += 1;
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

/// Single owner of the timer state
#[derive(Debug)]
pub struct AppState {
    inner: Mutex<Inner>,
    config: TimerConfig,
    /// Server metadata
    pub start_time: Instant,
    /// Last command tracking
    pub last_command: Mutex<Option<String>>,
    pub last_command_time: Mutex<Option<DateTime<Utc>>>,
    /// Latest snapshot for the presentation layer
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerSnapshot>,
    /// Lifecycle and edge notifications
    pub event_tx: broadcast::Sender<TimerEvent>,
    alert_tx: Option<AlertSender>,
}

impl AppState {
    /// Create an idle controller
    pub fn new(config: TimerConfig, alert_tx: Option<AlertSender>) -> Self {
        let countdown = Countdown::new(config);
        let (timer_update_tx, timer_update_rx) = watch::channel(countdown.snapshot());
        let (event_tx, _) = broadcast::channel(100);

        Self {
            inner: Mutex::new(Inner {
                countdown,
                generation: 0,
                ticker: None,
            }),
            config,
            start_time: Instant::now(),
            last_command: Mutex::new(None),
            last_command_time: Mutex::new(None),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
            event_tx,
            alert_tx,
        }
    }

    /// Create a shared controller and start it if auto-start is configured.
    /// Must be called from within a tokio runtime.
    pub fn launch(config: TimerConfig, alert_tx: Option<AlertSender>) -> Result<Arc<Self>, CountdownError> {
        let state = Arc::new(Self::new(config, alert_tx));
        if config.auto_start() {
            info!("Auto-start enabled");
            state.start()?;
        }
        Ok(state)
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Watch the snapshot published after every change
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, CountdownError> {
        self.inner
            .lock()
            .map_err(|e| CountdownError::StateUnavailable(format!("Failed to lock timer state: {}", e)))
    }

    /// `Idle|Paused → Running`; no-op when running or expired
    pub fn start(self: &Arc<Self>) -> Result<TimerSnapshot, CountdownError> {
        let mut inner = self.lock()?;
        self.record_command("start");
        self.start_locked(&mut inner);
        Ok(inner.countdown.snapshot())
    }

    /// `Running → Paused`; no-op otherwise. No tick lands after this returns.
    pub fn pause(&self) -> Result<TimerSnapshot, CountdownError> {
        let mut inner = self.lock()?;
        self.record_command("pause");
        self.pause_locked(&mut inner);
        Ok(inner.countdown.snapshot())
    }

    /// Pause when running, start otherwise, decided under the same guard
    pub fn toggle(self: &Arc<Self>) -> Result<TimerSnapshot, CountdownError> {
        let mut inner = self.lock()?;
        self.record_command("toggle");

        if inner.countdown.state().is_running() {
            self.pause_locked(&mut inner);
        } else {
            self.start_locked(&mut inner);
        }
        Ok(inner.countdown.snapshot())
    }

    /// Return to the initial idle state, re-arming if configured to
    pub fn reset(self: &Arc<Self>) -> Result<TimerSnapshot, CountdownError> {
        let mut inner = self.lock()?;
        self.record_command("reset");

        inner.halt_clock();
        inner.countdown.reset();
        info!("Timer reset to {}s", self.config.total_duration_seconds());
        self.publish(&inner);
        self.emit(TimerEvent::Reset);

        if self.config.rearm_on_reset() {
            self.start_locked(&mut inner);
        }
        Ok(inner.countdown.snapshot())
    }

    /// Get current snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, CountdownError> {
        Ok(self.lock()?.countdown.snapshot())
    }

    /// Get current timer state
    pub fn timer_state(&self) -> Result<TimerState, CountdownError> {
        Ok(self.lock()?.countdown.state().clone())
    }

    /// Whether a tick task is currently registered
    pub fn has_clock(&self) -> Result<bool, CountdownError> {
        Ok(self.lock()?.ticker.is_some())
    }

    fn start_locked(self: &Arc<Self>, inner: &mut Inner) {
        if !inner.countdown.start() {
            debug!("Start ignored, timer is {:?}", inner.countdown.state().run_state);
            return;
        }

        inner.generation += 1;
        inner.ticker = Some(spawn_clock(self, inner.generation));

        let remaining_seconds = inner.countdown.state().remaining_seconds;
        info!("Timer started at {}s remaining", remaining_seconds);
        self.publish(inner);
        self.emit(TimerEvent::Started { remaining_seconds });
    }

    fn pause_locked(&self, inner: &mut Inner) {
        if !inner.countdown.pause() {
            debug!("Pause ignored, timer is not running");
            return;
        }

        inner.halt_clock();
        let remaining_seconds = inner.countdown.state().remaining_seconds;
        info!("Timer paused at {}s remaining", remaining_seconds);
        self.publish(inner);
        self.emit(TimerEvent::Paused { remaining_seconds });
    }

    /// Apply one tick from the clock task. Returns false when the task should stop.
    pub(crate) fn on_tick(&self, generation: u64) -> bool {
        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(e) => {
                error!("Dropping tick: {}", e);
                return false;
            }
        };

        if inner.generation != generation {
            debug!("Dropping stale tick from generation {}", generation);
            return false;
        }

        let outcome = inner.countdown.tick();
        debug!("Tick: {}s remaining ({:?})", outcome.remaining_seconds, outcome.phase);
        self.publish(&inner);

        if outcome.edges.warning_entered {
            info!("Warning phase entered at {}s remaining", outcome.remaining_seconds);
            self.emit(TimerEvent::WarningEntered {
                remaining_seconds: outcome.remaining_seconds,
            });
            self.request_alert(outcome.remaining_seconds);
        }

        if outcome.edges.expired_entered {
            info!("Countdown expired, event closed");
            self.emit(TimerEvent::Expired);
        }

        if outcome.stopped {
            inner.generation += 1;
            inner.ticker = None;
            return false;
        }
        true
    }

    fn publish(&self, inner: &Inner) {
        if let Err(e) = self.timer_update_tx.send(inner.countdown.snapshot()) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    fn emit(&self, event: TimerEvent) {
        // No subscribers is normal
        if self.event_tx.send(event).is_err() {
            debug!("No listeners for timer event");
        }
    }

    fn request_alert(&self, remaining_seconds: u64) {
        let Some(alert_tx) = &self.alert_tx else {
            debug!("No alert service configured");
            return;
        };
        if let Err(e) = alert_tx.try_send(AlertRequest { remaining_seconds }) {
            warn!("Failed to request warning alert: {}", e);
        }
    }

    fn record_command(&self, command: &str) {
        if let Ok(mut last_command) = self.last_command.lock() {
            *last_command = Some(command.to_string());
        }
        if let Ok(mut last_time) = self.last_command_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last command information
    pub fn get_last_command(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_command = self.last_command.lock().ok().and_then(|c| c.clone());
        let last_command_time = self.last_command_time.lock().ok().and_then(|t| *t);
        (last_command, last_command_time)
    }
}
