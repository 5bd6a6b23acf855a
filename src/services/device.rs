//! Device audio backends for the warning alert
//!
//! Playback goes through rodio with the default `audio` feature. Headless
//! builds (`--no-default-features`) leave it out; then both backends report
//! themselves unavailable and the dispatcher degrades to a visual-only
//! warning.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, warn};

use super::{
    alert::{AudioCue, ToneEngine},
    tone::ToneSpec,
};
use crate::error::AlertError;

/// Warning cue loaded from disk at startup
pub struct FileCue {
    path: PathBuf,
    bytes: Result<Arc<[u8]>, String>,
}

impl FileCue {
    /// Read the cue into memory. A missing file is reported when played.
    pub fn preload(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let bytes: Result<Arc<[u8]>, String> = std::fs::read(&path)
            .map(Arc::from)
            .map_err(|e| format!("{}: {}", path.display(), e));

        match &bytes {
            Ok(data) => debug!("Loaded warning cue {} ({} bytes)", path.display(), data.len()),
            Err(e) => warn!("Warning cue unavailable, tone fallback will be used: {}", e),
        }

        Self { path, bytes }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.bytes.is_ok()
    }
}

impl AudioCue for FileCue {
    fn play(&self) -> Result<(), AlertError> {
        let bytes = self
            .bytes
            .as_ref()
            .map_err(|e| AlertError::AudioPlaybackUnavailable(e.clone()))?;
        playback::play_cue(Arc::clone(bytes))
    }
}

/// Fallback tone played on the default output device
#[derive(Debug, Default, Clone, Copy)]
pub struct DeviceTone;

impl ToneEngine for DeviceTone {
    fn play_tone(&self, spec: &ToneSpec) -> Result<(), AlertError> {
        playback::play_tone(spec)
    }
}

#[cfg(feature = "audio")]
mod playback {
    use std::{io::Cursor, sync::Arc, time::Duration};

    use rodio::{Decoder, OutputStream, Sink, Source};

    use crate::{
        error::AlertError,
        services::tone::{ToneSpec, TonePulse},
    };

    impl Source for TonePulse {
        fn current_frame_len(&self) -> Option<usize> {
            Some(self.remaining_samples())
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            self.spec().sample_rate
        }

        fn total_duration(&self) -> Option<Duration> {
            Some(self.spec().envelope.duration())
        }
    }

    pub fn play_cue(bytes: Arc<[u8]>) -> Result<(), AlertError> {
        let unavailable = |e: String| AlertError::AudioPlaybackUnavailable(e);

        let (_stream, stream_handle) = OutputStream::try_default().map_err(|e| unavailable(e.to_string()))?;
        let source = Decoder::new(Cursor::new(bytes)).map_err(|e| unavailable(e.to_string()))?;
        let sink = Sink::try_new(&stream_handle).map_err(|e| unavailable(e.to_string()))?;

        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }

    pub fn play_tone(spec: &ToneSpec) -> Result<(), AlertError> {
        let unavailable = |e: String| AlertError::ToneSynthesisUnavailable(e);

        let (_stream, stream_handle) = OutputStream::try_default().map_err(|e| unavailable(e.to_string()))?;
        let sink = Sink::try_new(&stream_handle).map_err(|e| unavailable(e.to_string()))?;

        sink.append(spec.pulse());
        sink.sleep_until_end();
        Ok(())
    }
}

#[cfg(not(feature = "audio"))]
mod playback {
    use std::sync::Arc;

    use crate::{error::AlertError, services::tone::ToneSpec};

    const NO_AUDIO: &str = "built without the `audio` feature";

    pub fn play_cue(_bytes: Arc<[u8]>) -> Result<(), AlertError> {
        Err(AlertError::AudioPlaybackUnavailable(NO_AUDIO.to_string()))
    }

    pub fn play_tone(_spec: &ToneSpec) -> Result<(), AlertError> {
        Err(AlertError::ToneSynthesisUnavailable(NO_AUDIO.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cue_reports_playback_unavailable() {
        let cue = FileCue::preload("definitely/not/here/warning.mp3");
        assert!(!cue.is_loaded());
        assert!(matches!(cue.play(), Err(AlertError::AudioPlaybackUnavailable(_))));
    }

    #[test]
    fn unreadable_cue_keeps_its_path() {
        let cue = FileCue::preload("missing-cue.wav");
        assert_eq!(cue.path(), Path::new("missing-cue.wav"));
    }

    #[test]
    fn readable_cue_is_loaded() {
        let path = std::env::temp_dir().join(format!("event-countdown-cue-{}.wav", std::process::id()));
        std::fs::write(&path, b"RIFF").expect("write cue");

        let cue = FileCue::preload(&path);
        std::fs::remove_file(&path).expect("remove cue");

        assert!(cue.is_loaded());
        assert_eq!(cue.path(), path.as_path());
    }

    #[cfg(feature = "audio")]
    #[test]
    fn tone_pulse_plays_as_a_mono_rodio_source() {
        use rodio::Source;
        use std::time::Duration;

        let pulse = ToneSpec::default().pulse();
        assert_eq!(pulse.channels(), 1);
        assert_eq!(pulse.sample_rate(), 44_100);
        assert_eq!(pulse.total_duration(), Some(Duration::from_millis(500)));
        assert_eq!(pulse.current_frame_len(), Some(22_050));
    }
}
