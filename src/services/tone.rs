//! Fallback warning tone
//!
//! A short oscillator pulse whose gain decays exponentially,
//! `g(t) = g0 * exp(-k * t)`, with `k` chosen so the gain reaches the
//! final level exactly at the end of the pulse. Sample generation is pure
//! so it can be checked without an output device.

use std::time::Duration;

/// A4
pub const TONE_FREQUENCY_HZ: f32 = 440.0;
pub const PULSE_DURATION: Duration = Duration::from_millis(500);
pub const INITIAL_GAIN: f32 = 0.1;
pub const FINAL_GAIN: f32 = 0.000_01;
pub const SAMPLE_RATE: u32 = 44_100;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

impl Waveform {
    /// Sample at a cycle position in `[0, 1)`, range `[-1, 1]`
    fn sample(&self, cycle: f32) -> f32 {
        match self {
            Waveform::Sine => (2.0 * std::f32::consts::PI * cycle).sin(),
            Waveform::Sawtooth => 2.0 * cycle - 1.0,
        }
    }
}

/// Exponential gain envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    initial_gain: f32,
    final_gain: f32,
    duration: Duration,
    decay_rate: f32,
}

impl Envelope {
    /// Decay from `initial_gain` to `final_gain` over `duration`.
    ///
    /// Both gains must be positive with `final_gain < initial_gain`.
    pub fn exponential(initial_gain: f32, final_gain: f32, duration: Duration) -> Self {
        let seconds = duration.as_secs_f32();
        let decay_rate = if seconds > 0.0 && final_gain > 0.0 {
            (initial_gain / final_gain).ln() / seconds
        } else {
            0.0
        };
        Self {
            initial_gain,
            final_gain,
            duration,
            decay_rate,
        }
    }

    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Gain at `t` seconds from pulse start; silent after the pulse ends
    pub fn gain_at(&self, t: f32) -> f32 {
        if t <= 0.0 {
            self.initial_gain
        } else if t > self.duration.as_secs_f32() {
            0.0
        } else {
            (self.initial_gain * (-self.decay_rate * t).exp()).max(self.final_gain)
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::exponential(INITIAL_GAIN, FINAL_GAIN, PULSE_DURATION)
    }
}

/// Parameters of one warning pulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub envelope: Envelope,
    pub sample_rate: u32,
}

impl ToneSpec {
    pub fn total_samples(&self) -> usize {
        (self.envelope.duration().as_secs_f64() * self.sample_rate as f64).round() as usize
    }

    pub fn pulse(&self) -> TonePulse {
        TonePulse::new(*self)
    }
}

impl Default for ToneSpec {
    fn default() -> Self {
        Self {
            frequency_hz: TONE_FREQUENCY_HZ,
            waveform: Waveform::Sawtooth,
            envelope: Envelope::default(),
            sample_rate: SAMPLE_RATE,
        }
    }
}

/// Mono sample stream of a single pulse
#[derive(Debug, Clone)]
pub struct TonePulse {
    spec: ToneSpec,
    index: usize,
    total_samples: usize,
}

impl TonePulse {
    pub fn new(spec: ToneSpec) -> Self {
        Self {
            total_samples: spec.total_samples(),
            spec,
            index: 0,
        }
    }

    pub fn spec(&self) -> &ToneSpec {
        &self.spec
    }

    pub fn remaining_samples(&self) -> usize {
        self.total_samples - self.index
    }
}

impl Iterator for TonePulse {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total_samples {
            return None;
        }
        let t = self.index as f32 / self.spec.sample_rate as f32;
        let cycle = (t * self.spec.frequency_hz).fract();
        self.index += 1;
        Some(self.spec.waveform.sample(cycle) * self.spec.envelope.gain_at(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_samples();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TonePulse {}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, rel: f32) -> bool {
        (a - b).abs() <= rel * b.abs().max(f32::EPSILON)
    }

    #[test]
    fn envelope_spans_initial_to_final_gain() {
        let envelope = Envelope::default();
        assert_eq!(envelope.gain_at(0.0), INITIAL_GAIN);
        assert!(close(envelope.gain_at(0.5), FINAL_GAIN, 1e-2));
        assert_eq!(envelope.gain_at(0.6), 0.0);
    }

    #[test]
    fn envelope_decays_monotonically() {
        let envelope = Envelope::default();
        let mut previous = envelope.gain_at(0.0);
        for step in 1..=50 {
            let gain = envelope.gain_at(step as f32 * 0.01);
            assert!(gain < previous, "step {step}: {gain} >= {previous}");
            previous = gain;
        }
    }

    #[test]
    fn decay_rate_matches_closed_form() {
        let envelope = Envelope::exponential(0.1, 0.00001, Duration::from_millis(500));
        // ln(10^4) / 0.5
        assert!(close(envelope.decay_rate(), 18.420_68, 1e-4));
        assert!(close(envelope.gain_at(0.25), 0.001, 1e-3));
    }

    #[test]
    fn pulse_length_follows_duration_and_rate() {
        let pulse = ToneSpec::default().pulse();
        assert_eq!(pulse.len(), 22_050);
        assert_eq!(pulse.count(), 22_050);
    }

    #[test]
    fn samples_stay_under_the_envelope() {
        let spec = ToneSpec::default();
        for (i, sample) in spec.pulse().enumerate() {
            let t = i as f32 / spec.sample_rate as f32;
            assert!(sample.abs() <= spec.envelope.gain_at(t) + 1e-6, "sample {i}");
        }
    }

    #[test]
    fn pulse_fades_to_near_silence() {
        let samples: Vec<f32> = ToneSpec::default().pulse().collect();
        let head = samples[..441].iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        let tail = samples[samples.len() - 441..].iter().fold(0.0f32, |acc, s| acc.max(s.abs()));

        assert!(head > 0.05);
        assert!(tail < 0.0001);
    }

    #[test]
    fn sine_pulse_starts_at_zero_crossing() {
        let spec = ToneSpec {
            waveform: Waveform::Sine,
            ..ToneSpec::default()
        };
        let first = spec.pulse().next().expect("sample");
        assert!(first.abs() < 1e-6);
    }
}
