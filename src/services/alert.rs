//! Warning alert dispatch
//!
//! Runs in a background task, receiving one-shot requests via channel.
//! Each request tries the primary audio cue first and falls back to the
//! synthesized tone. Failures only degrade the alert to visual-only.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::tone::ToneSpec;
use crate::error::AlertError;

/// Primary warning sound
pub trait AudioCue: Send + Sync {
    fn play(&self) -> Result<(), AlertError>;
}

/// Fallback tone generator
pub trait ToneEngine: Send + Sync {
    fn play_tone(&self, spec: &ToneSpec) -> Result<(), AlertError>;
}

/// Which path produced the alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    Cue,
    Tone,
    /// Neither cue nor tone were available
    Silent,
}

/// One-shot trigger sent on warning edge-entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertRequest {
    pub remaining_seconds: u64,
}

/// Cue-then-tone dispatcher
pub struct AlertDispatcher {
    cue: Box<dyn AudioCue>,
    tone: Box<dyn ToneEngine>,
    spec: ToneSpec,
}

impl AlertDispatcher {
    pub fn new(cue: Box<dyn AudioCue>, tone: Box<dyn ToneEngine>) -> Self {
        Self {
            cue,
            tone,
            spec: ToneSpec::default(),
        }
    }

    /// Play the alert. Blocks for the duration of playback.
    pub fn dispatch(&self) -> AlertOutcome {
        let cue_error = match self.cue.play() {
            Ok(()) => return AlertOutcome::Cue,
            Err(e) => e,
        };
        warn!("Warning cue failed, falling back to tone: {}", cue_error);

        match self.tone.play_tone(&self.spec) {
            Ok(()) => AlertOutcome::Tone,
            Err(e) => {
                error!("Warning tone failed, alert is visual only: {}", e);
                AlertOutcome::Silent
            }
        }
    }
}

/// Sender handle for alert requests
pub type AlertSender = mpsc::Sender<AlertRequest>;

/// Create a new alert channel
pub fn create_alert_channel() -> (AlertSender, mpsc::Receiver<AlertRequest>) {
    mpsc::channel(8)
}

/// Background service that plays alerts off the tick path
pub struct AlertService {
    request_rx: mpsc::Receiver<AlertRequest>,
    dispatcher: Arc<AlertDispatcher>,
}

impl AlertService {
    pub fn new(request_rx: mpsc::Receiver<AlertRequest>, dispatcher: AlertDispatcher) -> Self {
        Self {
            request_rx,
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Run until every sender is dropped
    pub async fn run(mut self) {
        info!("Starting alert service");

        while let Some(request) = self.request_rx.recv().await {
            debug!("Alert requested at {}s remaining", request.remaining_seconds);

            let dispatcher = Arc::clone(&self.dispatcher);
            match tokio::task::spawn_blocking(move || dispatcher.dispatch()).await {
                Ok(outcome) => info!("Warning alert played: {:?}", outcome),
                Err(e) => error!("Alert playback task failed: {}", e),
            }
        }

        debug!("Alert channel closed, stopping alert service");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct Calls(Arc<AtomicUsize>);

    impl Calls {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct FakeCue {
        calls: Calls,
        result: Result<(), AlertError>,
    }

    impl AudioCue for FakeCue {
        fn play(&self) -> Result<(), AlertError> {
            self.calls.0.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct FakeTone {
        calls: Calls,
        result: Result<(), AlertError>,
    }

    impl ToneEngine for FakeTone {
        fn play_tone(&self, spec: &ToneSpec) -> Result<(), AlertError> {
            assert_eq!(spec.frequency_hz, 440.0);
            self.calls.0.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn dispatcher(
        cue: Result<(), AlertError>,
        tone: Result<(), AlertError>,
    ) -> (AlertDispatcher, Calls, Calls) {
        let cue_calls = Calls::default();
        let tone_calls = Calls::default();
        let dispatcher = AlertDispatcher::new(
            Box::new(FakeCue { calls: cue_calls.clone(), result: cue }),
            Box::new(FakeTone { calls: tone_calls.clone(), result: tone }),
        );
        (dispatcher, cue_calls, tone_calls)
    }

    fn cue_missing() -> AlertError {
        AlertError::AudioPlaybackUnavailable("warning.mp3 not found".to_string())
    }

    fn no_device() -> AlertError {
        AlertError::ToneSynthesisUnavailable("no output device".to_string())
    }

    #[test]
    fn plays_cue_without_touching_tone() {
        let (dispatcher, cue, tone) = dispatcher(Ok(()), Ok(()));
        assert_eq!(dispatcher.dispatch(), AlertOutcome::Cue);
        assert_eq!(cue.count(), 1);
        assert_eq!(tone.count(), 0);
    }

    #[test]
    fn falls_back_to_tone_when_cue_fails() {
        let (dispatcher, cue, tone) = dispatcher(Err(cue_missing()), Ok(()));
        assert_eq!(dispatcher.dispatch(), AlertOutcome::Tone);
        assert_eq!(cue.count(), 1);
        assert_eq!(tone.count(), 1);
    }

    #[test]
    fn degrades_to_silent_when_nothing_can_play() {
        let (dispatcher, _, tone) = dispatcher(Err(cue_missing()), Err(no_device()));
        assert_eq!(dispatcher.dispatch(), AlertOutcome::Silent);
        assert_eq!(tone.count(), 1);
    }

    #[tokio::test]
    async fn service_dispatches_each_request_until_closed() {
        let (dispatcher, cue, tone) = dispatcher(Err(cue_missing()), Ok(()));
        let (tx, rx) = create_alert_channel();

        tx.send(AlertRequest { remaining_seconds: 1800 }).await.expect("send");
        tx.send(AlertRequest { remaining_seconds: 1800 }).await.expect("send");
        drop(tx);

        AlertService::new(rx, dispatcher).run().await;
        assert_eq!(cue.count(), 2);
        assert_eq!(tone.count(), 2);
    }
}
